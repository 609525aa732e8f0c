//! In-process event pump
//!
//! Agents subscribe to the `command_initiated` keynode. `pump` takes a
//! snapshot of its outgoing edges and offers each one to the agents in
//! registration order until one of them reports `Ok`.

use std::sync::Arc;

use serde::Serialize;

use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{ElementType, GraphStore, Keynodes, ResultCode, TypeFilter};

use crate::agent::Agent;
use crate::commands::elapsed_ms;
use crate::errors::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpReport {
    /// Signals some agent completed
    pub handled: usize,
    /// Signals no agent accepted; they stay in the graph
    pub unhandled: usize,
}

pub struct Dispatcher {
    store: Arc<dyn GraphStore>,
    keynodes: Arc<Keynodes>,
    agents: Vec<Box<dyn Agent>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn GraphStore>, keynodes: Arc<Keynodes>) -> Self {
        Self {
            store,
            keynodes,
            agents: Vec::new(),
        }
    }

    pub fn register(&mut self, agent: impl Agent + 'static) {
        tracing::debug!(agent = agent.name(), "agent registered");
        self.agents.push(Box::new(agent));
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Offer every pending initiated command to the registered agents
    ///
    /// # Errors
    ///
    /// Stops at the first fatal agent error and returns it.
    pub fn pump(&self) -> Result<PumpReport> {
        log_op_start!("pump", agents = self.agents.len());
        let start = std::time::Instant::now();

        let report = self.pump_impl().map_err(|e| {
            log_op_error!("pump", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        log_op_end!(
            "pump",
            duration_ms = elapsed_ms(start),
            handled = report.handled,
            unhandled = report.unhandled
        );
        Ok(report)
    }

    fn pump_impl(&self) -> Result<PumpReport> {
        let listen = self.keynodes.command_initiated();
        let pending = self
            .store
            .iter3(listen, ElementType::EdgeAccess, TypeFilter::Any);

        let mut report = PumpReport::default();
        for signal in pending {
            let mut handled = false;
            for agent in &self.agents {
                if agent.run(listen, signal.edge, signal.target)? == ResultCode::Ok {
                    tracing::debug!(agent = agent.name(), command = %signal.target, "signal handled");
                    handled = true;
                    break;
                }
            }
            if handled {
                report.handled += 1;
            } else {
                report.unhandled += 1;
            }
        }
        Ok(report)
    }
}
