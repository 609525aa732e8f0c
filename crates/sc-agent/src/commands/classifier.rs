//! Result read-back
//!
//! A finished command links to its result struct through a common edge
//! tagged by `nrel_result`. The struct is a member of exactly one result-code
//! keynode, and that keynode is a member of the `sc_result` root.

use sc_core::errors::{ExError, ExErrorKind};
use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{
    Addr, ElementType, GraphStore, Keynodes, ResultCode, Template, TemplateItem, TypeFilter,
};

use super::elapsed_ms;
use crate::errors::Result;

const RESULT_CLASS: &str = "result_class";

/// Result struct of `command`, `Addr::Invalid` while none is published
pub fn get_command_result_addr(store: &dyn GraphStore, keynodes: &Keynodes, command: Addr) -> Addr {
    if !command.is_valid() {
        return Addr::Invalid;
    }
    store
        .iter5(
            command,
            ElementType::EdgeCommon,
            TypeFilter::Exact(ElementType::NodeStruct),
            ElementType::EdgeAccess,
            keynodes.nrel_result(),
        )
        .first()
        .map(|m| m.target)
        .unwrap_or_default()
}

/// Result code published for `command`
///
/// `Unknown` means no result is available yet, or the result struct is not
/// classified by any result-code keynode.
///
/// # Errors
///
/// Returns `FatalInvariant` when the result struct is classified by more
/// than one result code.
pub fn get_command_result_code(
    store: &dyn GraphStore,
    keynodes: &Keynodes,
    command: Addr,
) -> Result<ResultCode> {
    log_op_start!("get_command_result_code", command = %command);
    let start = std::time::Instant::now();

    let code = classify(store, keynodes, command).map_err(|e| {
        log_op_error!(
            "get_command_result_code",
            e.clone(),
            duration_ms = elapsed_ms(start),
            command = %command
        );
        e
    })?;

    log_op_end!(
        "get_command_result_code",
        duration_ms = elapsed_ms(start),
        command = %command,
        result_code = %code
    );
    Ok(code)
}

fn classify(store: &dyn GraphStore, keynodes: &Keynodes, command: Addr) -> Result<ResultCode> {
    let result = get_command_result_addr(store, keynodes, command);
    if !result.is_valid() {
        return Ok(ResultCode::Unknown);
    }

    let template = Template::new()
        .triple(
            keynodes.result_classes_root(),
            ElementType::EdgeAccess,
            TemplateItem::var(ElementType::NodeClass).named(RESULT_CLASS),
        )
        .triple(RESULT_CLASS, ElementType::EdgeAccess, result);

    let bindings = store.search_template(&template);
    match bindings.as_slice() {
        [] => Ok(ResultCode::Unknown),
        [binding] => Ok(keynodes
            .result_code_by_addr(binding.get(RESULT_CLASS))
            .unwrap_or(ResultCode::Unknown)),
        many => Err(ExError::new(ExErrorKind::FatalInvariant)
            .with_op("get_command_result_code")
            .with_element(result)
            .with_message(format!(
                "result struct is classified by {} result codes",
                many.len()
            ))),
    }
}
