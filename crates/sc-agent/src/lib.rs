//! sc-agent - command/action execution protocol
//!
//! An agent watches for initiated commands, moves each one through
//! initiated → in-progress → finished, runs its `ActionBody`, and publishes a
//! classified result struct back into the graph.
//!
//! ## Logging Ownership
//!
//! Public operations in this crate own lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The store and `sc-core` only emit `debug`/`trace` details.

pub mod agent;
pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod errors;

pub use agent::{ActionAgent, ActionBody, ActionContext, Agent};
pub use bootstrap::initialize;
pub use commands::classifier::{get_command_result_addr, get_command_result_code};
pub use commands::factory::create_command;
pub use commands::lifecycle::{command_state, initiate_command, CommandState};
pub use commands::params::{get_param, get_param_by_index};
pub use config::AgentConfig;
pub use dispatcher::{Dispatcher, PumpReport};
pub use errors::Result;
