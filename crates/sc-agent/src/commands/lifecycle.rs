//! Command lifecycle markers
//!
//! Lifecycle state is encoded as access edges from marker keynodes to the
//! command instance: `command_initiated`, `command_in_progress` and
//! `command_finished`.

use serde::Serialize;

use sc_core::errors::{ExError, ExErrorKind};
use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{Addr, ElementType, GraphStore, Keynodes};

use super::elapsed_ms;
use crate::errors::{fatal_invariant, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandState {
    Unstarted,
    Initiated,
    InProgress,
    Finished,
}

impl std::fmt::Display for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CommandState::Unstarted => "unstarted",
            CommandState::Initiated => "initiated",
            CommandState::InProgress => "in_progress",
            CommandState::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Current lifecycle state, most advanced marker first
///
/// A claimed command that has not finished counts as in progress, including
/// the stretch between erasing the progress marker and writing the finished
/// one.
pub fn command_state(store: &dyn GraphStore, keynodes: &Keynodes, command: Addr) -> CommandState {
    let marked = |marker: Addr| store.edge_exists(marker, command, ElementType::EdgeAccess);

    if marked(keynodes.command_finished()) {
        CommandState::Finished
    } else if marked(keynodes.command_in_progress()) || marked(keynodes.command_claimed()) {
        CommandState::InProgress
    } else if marked(keynodes.command_initiated()) {
        CommandState::Initiated
    } else {
        CommandState::Unstarted
    }
}

/// Mark `command` as initiated
///
/// Returns `false` without writing anything when the command is already
/// initiated, in progress or finished. Concurrent callers race on a single
/// conditional create, so at most one of them gets `true`.
///
/// # Errors
///
/// - `InvalidInput`: `command` is not a live element
/// - `FatalInvariant`: the store rejected the marker edge
pub fn initiate_command(store: &dyn GraphStore, keynodes: &Keynodes, command: Addr) -> Result<bool> {
    log_op_start!("initiate_command", command = %command);
    let start = std::time::Instant::now();

    let initiated = initiate_command_impl(store, keynodes, command).map_err(|e| {
        log_op_error!(
            "initiate_command",
            e.clone(),
            duration_ms = elapsed_ms(start),
            command = %command
        );
        e
    })?;

    log_op_end!(
        "initiate_command",
        duration_ms = elapsed_ms(start),
        command = %command,
        initiated = initiated
    );
    Ok(initiated)
}

fn initiate_command_impl(store: &dyn GraphStore, keynodes: &Keynodes, command: Addr) -> Result<bool> {
    if !store.is_element(command) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("initiate_command")
            .with_element(command)
            .with_message("command does not exist"));
    }

    let state = command_state(store, keynodes, command);
    if state != CommandState::Unstarted {
        tracing::debug!(%command, %state, "command already started");
        return Ok(false);
    }

    let outcome = store
        .create_edge_if_absent(
            ElementType::EdgeAccess,
            keynodes.command_initiated(),
            command,
        )
        .map_err(|e| fatal_invariant("initiate_command", "initiated marker", e))?;
    Ok(outcome.is_created())
}
