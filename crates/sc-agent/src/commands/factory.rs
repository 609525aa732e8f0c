//! Command instance construction

use sc_core::errors::{ExError, ExErrorKind};
use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{Addr, ElementType, GraphStore, Keynodes};

use super::elapsed_ms;
use crate::errors::{fatal_invariant, invalid_parameters, Result};

/// Create a command instance of `class` with ordered `params`
///
/// Parameter `i` is attached to the instance through an access edge tagged
/// by `rrel_{i+1}`.
///
/// # Errors
///
/// - `InvalidParameters`: `params.len()` is not below the registry's ordinal
///   relation count; nothing is written
/// - `InvalidInput`: `class` is not a live element; nothing is written
/// - `FatalInvariant`: the store rejected one of the writes
pub fn create_command(
    store: &dyn GraphStore,
    keynodes: &Keynodes,
    class: Addr,
    params: &[Addr],
) -> Result<Addr> {
    log_op_start!(
        "create_command",
        command_class = %class,
        param_count = params.len()
    );
    let start = std::time::Instant::now();

    let command = create_command_impl(store, keynodes, class, params).map_err(|e| {
        log_op_error!("create_command", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "create_command",
        duration_ms = elapsed_ms(start),
        command = %command
    );
    Ok(command)
}

fn create_command_impl(
    store: &dyn GraphStore,
    keynodes: &Keynodes,
    class: Addr,
    params: &[Addr],
) -> Result<Addr> {
    if params.len() >= keynodes.ordinal_relation_count() {
        return Err(invalid_parameters(
            params.len(),
            keynodes.ordinal_relation_count(),
        ));
    }
    if !store.is_element(class) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("create_command")
            .with_element(class)
            .with_message("command class does not exist"));
    }

    let command = store
        .create_node(ElementType::Node)
        .map_err(|e| fatal_invariant("create_command", "command node", e))?;
    store
        .create_edge(ElementType::EdgeAccess, class, command)
        .map_err(|e| fatal_invariant("create_command", "class membership", e))?;

    for (index, param) in params.iter().enumerate() {
        let edge = store
            .create_edge(ElementType::EdgeAccess, command, *param)
            .map_err(|e| fatal_invariant("create_command", "parameter edge", e))?;
        store
            .create_edge(
                ElementType::EdgeAccess,
                keynodes.ordinal_relation(index),
                edge,
            )
            .map_err(|e| fatal_invariant("create_command", "ordinal tag", e))?;
        tracing::debug!(%command, index, param = %param, "parameter attached");
    }

    Ok(command)
}
