//! Outcome codes published by actions
//!
//! Every code has a keynode in the graph (see `Keynodes`). The system
//! identifier of that keynode is `sc_result_<name>`.

use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    Error,
    Ok,
    ErrorInvalidParams,
    ErrorInvalidType,
    ErrorIo,
    ErrorInvalidState,
    ErrorNotFound,
    ErrorNoWriteRights,
    ErrorNoReadRights,
    No,
    Unknown,
}

impl ResultCode {
    pub const ALL: [ResultCode; 11] = [
        ResultCode::Error,
        ResultCode::Ok,
        ResultCode::ErrorInvalidParams,
        ResultCode::ErrorInvalidType,
        ResultCode::ErrorIo,
        ResultCode::ErrorInvalidState,
        ResultCode::ErrorNotFound,
        ResultCode::ErrorNoWriteRights,
        ResultCode::ErrorNoReadRights,
        ResultCode::No,
        ResultCode::Unknown,
    ];

    /// Short name, e.g. `error_invalid_params`
    pub fn name(self) -> &'static str {
        match self {
            ResultCode::Error => "error",
            ResultCode::Ok => "ok",
            ResultCode::ErrorInvalidParams => "error_invalid_params",
            ResultCode::ErrorInvalidType => "error_invalid_type",
            ResultCode::ErrorIo => "error_io",
            ResultCode::ErrorInvalidState => "error_invalid_state",
            ResultCode::ErrorNotFound => "error_not_found",
            ResultCode::ErrorNoWriteRights => "error_no_write_rights",
            ResultCode::ErrorNoReadRights => "error_no_read_rights",
            ResultCode::No => "no",
            ResultCode::Unknown => "unknown",
        }
    }

    /// System identifier of the keynode standing for this code
    pub fn system_idtf(self) -> String {
        format!("sc_result_{}", self.name())
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }

    /// `Error` and every `Error*` refinement
    pub fn is_error(self) -> bool {
        matches!(
            self,
            ResultCode::Error
                | ResultCode::ErrorInvalidParams
                | ResultCode::ErrorInvalidType
                | ResultCode::ErrorIo
                | ResultCode::ErrorInvalidState
                | ResultCode::ErrorNotFound
                | ResultCode::ErrorNoWriteRights
                | ResultCode::ErrorNoReadRights
        )
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts both the short name (`ok`) and the system identifier (`sc_result_ok`)
impl FromStr for ResultCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("sc_result_").unwrap_or(s);
        ResultCode::ALL
            .iter()
            .copied()
            .find(|code| code.name() == name)
            .ok_or_else(|| format!("unknown result code '{}'", s))
    }
}
