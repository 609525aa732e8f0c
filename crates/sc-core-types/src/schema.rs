//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the logging macros,
//! the error facility and the tests that assert on captured events.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Graph element identifiers
pub const FIELD_COMMAND: &str = "command";
pub const FIELD_COMMAND_CLASS: &str = "command_class";
pub const FIELD_RESULT: &str = "result";
pub const FIELD_RESULT_CODE: &str = "result_code";
pub const FIELD_PARAM_COUNT: &str = "param_count";
pub const FIELD_AGENT: &str = "agent";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_element_fields_are_distinct() {
        let fields = [
            FIELD_COMMAND,
            FIELD_COMMAND_CLASS,
            FIELD_RESULT,
            FIELD_RESULT_CODE,
            FIELD_PARAM_COUNT,
            FIELD_AGENT,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
