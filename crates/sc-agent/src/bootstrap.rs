//! Keynode bootstrap
//!
//! Replaces process-wide "initialised" state: callers resolve the registry
//! once and pass it to every operation and agent.

use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{GraphStore, Keynodes};

use crate::commands::elapsed_ms;
use crate::config::AgentConfig;
use crate::errors::{fatal_invariant, missing_keynode, Result};

/// Resolve (creating where missing) every keynode the protocol uses
///
/// # Errors
///
/// - `ConfigInvalid`: `config` does not validate
/// - `FatalInvariant`: the store rejected a keynode write
/// - `KeynodeMissing`: a keynode identifier is held by an element of the
///   wrong kind, e.g. a link named `sc_result_ok`
pub fn initialize(store: &dyn GraphStore, config: &AgentConfig) -> Result<Keynodes> {
    log_op_start!(
        "initialize",
        ordinal_relation_count = config.ordinal_relation_count
    );
    let start = std::time::Instant::now();

    let keynodes = initialize_impl(store, config).map_err(|e| {
        log_op_error!("initialize", e.clone(), duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "initialize",
        duration_ms = elapsed_ms(start),
        elements = store.element_count()
    );
    Ok(keynodes)
}

fn initialize_impl(store: &dyn GraphStore, config: &AgentConfig) -> Result<Keynodes> {
    config.validate()?;
    let keynodes = Keynodes::resolve(store, config.ordinal_relation_count)
        .map_err(|e| fatal_invariant("initialize", "keynode", e))?;

    if let Some(entry) = keynodes.mismatched(store).first() {
        return Err(missing_keynode(entry, store.element_type(entry.addr)));
    }
    Ok(keynodes)
}
