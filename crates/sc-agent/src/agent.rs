//! Agents and the action execution protocol
//!
//! An `ActionAgent` reacts to a dispatch signal (an edge whose target is a
//! command instance), moves the command through its lifecycle, runs the
//! injected `ActionBody`, and publishes the classified result struct.

use std::sync::Arc;

use sc_core::{log_op_end, log_op_error, log_op_start};
use sc_core::{Addr, ElementType, GraphStore, Keynodes, ResultCode, TypeFilter};
use sc_core_types::RequestId;

use crate::commands::elapsed_ms;
use crate::commands::params::{get_param, get_param_by_index};
use crate::errors::{broken_invariant, fatal_invariant, Result};

/// Everything an action body may look at while it runs
pub struct ActionContext<'a> {
    pub store: &'a dyn GraphStore,
    pub keynodes: &'a Keynodes,
    pub command: Addr,
    /// Empty struct the body may fill before the protocol classifies it
    pub result: Addr,
    pub request_id: &'a RequestId,
}

impl ActionContext<'_> {
    /// Parameter at zero-based `index`
    pub fn param(&self, index: usize) -> Addr {
        get_param_by_index(self.store, self.keynodes, self.command, index)
    }

    pub fn param_by_relation(&self, relation: Addr, filter: TypeFilter) -> Addr {
        get_param(self.store, self.command, relation, filter)
    }
}

/// Business logic run for each dispatched command
///
/// Failures are reported through the returned code; the protocol publishes
/// whatever code comes back.
pub trait ActionBody: Send + Sync {
    fn execute(&self, ctx: &ActionContext<'_>) -> ResultCode;
}

impl<F> ActionBody for F
where
    F: Fn(&ActionContext<'_>) -> ResultCode + Send + Sync,
{
    fn execute(&self, ctx: &ActionContext<'_>) -> ResultCode {
        self(ctx)
    }
}

/// Reaction to an event on a listened element
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// `listen` is the element the agent is subscribed to, `edge` the edge
    /// the event is about and `other` its far end.
    ///
    /// An agent without behaviour reports `Error`.
    ///
    /// # Errors
    ///
    /// Implementations return `Err` only for failures that leave the store
    /// in a state they cannot vouch for.
    fn run(&self, listen: Addr, edge: Addr, other: Addr) -> Result<ResultCode> {
        let _ = (listen, edge, other);
        Ok(ResultCode::Error)
    }
}

pub struct ActionAgent {
    name: String,
    command_class: Addr,
    store: Arc<dyn GraphStore>,
    keynodes: Arc<Keynodes>,
    body: Box<dyn ActionBody>,
}

impl ActionAgent {
    pub fn new(
        name: impl Into<String>,
        command_class: Addr,
        store: Arc<dyn GraphStore>,
        keynodes: Arc<Keynodes>,
        body: impl ActionBody + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            command_class,
            store,
            keynodes,
            body: Box::new(body),
        }
    }

    pub fn command_class(&self) -> Addr {
        self.command_class
    }

    /// Run the protocol for the command `command_edge` points at
    ///
    /// Returns `Ok(ResultCode::Error)` without touching the store when the
    /// edge is gone, its target is not a command of this agent's class, or
    /// the command already finished. Erasing `command_edge` consumes the
    /// signal, so among concurrent dispatchers of the same edge only one
    /// proceeds. The survivor then writes the permanent `command_claimed`
    /// marker; a command that already carries it was taken by a dispatcher
    /// holding another signal, and `Ok(ResultCode::Error)` comes back.
    /// Otherwise the body runs and `Ok(ResultCode::Ok)` comes back; the
    /// body's own code is published in the graph, not returned.
    ///
    /// # Errors
    ///
    /// Returns `FatalInvariant` once a protocol write fails after the command
    /// was claimed.
    pub fn dispatch(&self, listen: Addr, command_edge: Addr) -> Result<ResultCode> {
        let request_id = RequestId::new();
        log_op_start!(
            "dispatch",
            agent = %self.name,
            listen = %listen,
            command_edge = %command_edge,
            request_id = %request_id
        );
        let start = std::time::Instant::now();

        let code = self
            .dispatch_impl(command_edge, &request_id)
            .map_err(|e| {
                let e = e.with_request_id(request_id.clone());
                log_op_error!(
                    "dispatch",
                    e.clone(),
                    duration_ms = elapsed_ms(start),
                    agent = %self.name,
                    request_id = %request_id
                );
                e
            })?;

        log_op_end!(
            "dispatch",
            duration_ms = elapsed_ms(start),
            agent = %self.name,
            request_id = %request_id,
            result_code = %code
        );
        Ok(code)
    }

    fn dispatch_impl(&self, command_edge: Addr, request_id: &RequestId) -> Result<ResultCode> {
        let store = self.store.as_ref();
        let keynodes = self.keynodes.as_ref();

        let Some(signal) = store.edge_info(command_edge) else {
            tracing::debug!(%command_edge, "dispatch signal is not an edge");
            return Ok(ResultCode::Error);
        };
        let command = signal.target;
        if !store.edge_exists(self.command_class, command, ElementType::EdgeAccess) {
            tracing::debug!(%command, class = %self.command_class, "not a command of this class");
            return Ok(ResultCode::Error);
        }
        if store.edge_exists(keynodes.command_finished(), command, ElementType::EdgeAccess) {
            tracing::debug!(%command, "command already finished");
            return Ok(ResultCode::Error);
        }
        if !store.erase_element(command_edge) {
            tracing::debug!(%command, "dispatch signal consumed elsewhere");
            return Ok(ResultCode::Error);
        }

        let claim = store
            .create_edge_if_absent(
                ElementType::EdgeAccess,
                keynodes.command_claimed(),
                command,
            )
            .map_err(|e| fatal_invariant("dispatch", "claim marker", e))?;
        if !claim.is_created() {
            tracing::debug!(%command, "command claimed by another dispatcher");
            return Ok(ResultCode::Error);
        }

        let progress = store
            .create_edge_if_absent(
                ElementType::EdgeAccess,
                keynodes.command_in_progress(),
                command,
            )
            .map_err(|e| fatal_invariant("dispatch", "progress marker", e))?;
        if !progress.is_created() {
            tracing::warn!(%command, "command already in progress");
            return Ok(ResultCode::Error);
        }

        let result = store
            .create_node(ElementType::NodeStruct)
            .map_err(|e| fatal_invariant("dispatch", "result struct", e))?;

        let ctx = ActionContext {
            store,
            keynodes,
            command,
            result,
            request_id,
        };
        let code = self.body.execute(&ctx);
        tracing::debug!(%command, %result, result_code = %code, "action body finished");

        if !store.erase_element(progress.addr()) {
            return Err(broken_invariant(
                "dispatch",
                command,
                "progress marker vanished while the action ran",
            ));
        }

        let result_link = store
            .create_edge(ElementType::EdgeCommon, command, result)
            .map_err(|e| fatal_invariant("dispatch", "result link", e))?;
        store
            .create_edge(ElementType::EdgeAccess, keynodes.nrel_result(), result_link)
            .map_err(|e| fatal_invariant("dispatch", "result relation", e))?;
        store
            .create_edge(ElementType::EdgeAccess, keynodes.result_code(code), result)
            .map_err(|e| fatal_invariant("dispatch", "result classification", e))?;

        let finished = store
            .create_edge_if_absent(
                ElementType::EdgeAccess,
                keynodes.command_finished(),
                command,
            )
            .map_err(|e| fatal_invariant("dispatch", "finished marker", e))?;
        if !finished.is_created() {
            return Err(broken_invariant(
                "dispatch",
                command,
                "command finished twice",
            ));
        }

        Ok(ResultCode::Ok)
    }
}

impl Agent for ActionAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, listen: Addr, edge: Addr, _other: Addr) -> Result<ResultCode> {
        self.dispatch(listen, edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::classifier::{get_command_result_addr, get_command_result_code};
    use crate::commands::factory::create_command;
    use crate::commands::lifecycle::{command_state, CommandState};
    use sc_core::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Idle;

    impl Agent for Idle {
        fn name(&self) -> &str {
            "idle"
        }
    }

    fn setup() -> (Arc<MemoryStore>, Arc<Keynodes>, Addr) {
        let store = Arc::new(MemoryStore::new());
        let keynodes = Arc::new(Keynodes::resolve(store.as_ref(), 4).unwrap());
        let class = store.create_node(ElementType::NodeClass).unwrap();
        (store, keynodes, class)
    }

    fn signal(store: &MemoryStore, keynodes: &Keynodes, command: Addr) -> Addr {
        store
            .create_edge(ElementType::EdgeAccess, keynodes.command_initiated(), command)
            .unwrap()
    }

    #[test]
    fn test_default_run_reports_error() {
        assert_eq!(
            Idle.run(Addr::Invalid, Addr::Invalid, Addr::Invalid).unwrap(),
            ResultCode::Error
        );
    }

    #[test]
    fn test_dispatch_publishes_body_code() {
        let (store, keynodes, class) = setup();
        let agent = ActionAgent::new(
            "not_found",
            class,
            store.clone(),
            keynodes.clone(),
            |_: &ActionContext<'_>| ResultCode::ErrorNotFound,
        );
        let command = create_command(store.as_ref(), &keynodes, class, &[]).unwrap();
        let edge = signal(&store, &keynodes, command);

        let code = agent.dispatch(keynodes.command_initiated(), edge).unwrap();

        assert_eq!(code, ResultCode::Ok);
        assert!(!store.is_element(edge));
        assert_eq!(
            command_state(store.as_ref(), &keynodes, command),
            CommandState::Finished
        );
        assert_eq!(
            get_command_result_code(store.as_ref(), &keynodes, command).unwrap(),
            ResultCode::ErrorNotFound
        );
    }

    #[test]
    fn test_body_sees_params_and_progress() {
        let (store, keynodes, class) = setup();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_body = seen.clone();
        let agent = ActionAgent::new(
            "inspect",
            class,
            store.clone(),
            keynodes.clone(),
            move |ctx: &ActionContext<'_>| {
                assert!(ctx.store.edge_exists(
                    ctx.keynodes.command_in_progress(),
                    ctx.command,
                    ElementType::EdgeAccess
                ));
                assert_eq!(ctx.store.element_type(ctx.result), Some(ElementType::NodeStruct));
                let value = sc_core::utils::read_int(ctx.store, ctx.param(0));
                seen_in_body.store(value.unwrap_or_default() as usize, Ordering::SeqCst);
                ResultCode::Ok
            },
        );
        let param = store.create_link("7").unwrap();
        let command = create_command(store.as_ref(), &keynodes, class, &[param]).unwrap();
        let edge = signal(&store, &keynodes, command);

        agent.run(keynodes.command_initiated(), edge, command).unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 7);
        assert!(!store.edge_exists(
            keynodes.command_in_progress(),
            command,
            ElementType::EdgeAccess
        ));
    }

    #[test]
    fn test_foreign_command_is_not_touched() {
        let (store, keynodes, class) = setup();
        let other_class = store.create_node(ElementType::NodeClass).unwrap();
        let agent = ActionAgent::new(
            "ok",
            class,
            store.clone(),
            keynodes.clone(),
            |_: &ActionContext<'_>| ResultCode::Ok,
        );
        let command = create_command(store.as_ref(), &keynodes, other_class, &[]).unwrap();
        let edge = signal(&store, &keynodes, command);
        let before = store.element_count();

        let code = agent.dispatch(keynodes.command_initiated(), edge).unwrap();

        assert_eq!(code, ResultCode::Error);
        assert_eq!(store.element_count(), before);
        assert!(store.is_element(edge));
        assert_eq!(
            get_command_result_addr(store.as_ref(), &keynodes, command),
            Addr::Invalid
        );
    }

    #[test]
    fn test_missing_signal_is_routing_error() {
        let (store, keynodes, class) = setup();
        let agent = ActionAgent::new(
            "ok",
            class,
            store.clone(),
            keynodes.clone(),
            |_: &ActionContext<'_>| ResultCode::Ok,
        );
        assert_eq!(
            agent.dispatch(keynodes.command_initiated(), Addr::Invalid).unwrap(),
            ResultCode::Error
        );
    }

    #[test]
    fn test_command_in_progress_elsewhere_is_refused() {
        let (store, keynodes, class) = setup();
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_in_body = runs.clone();
        let agent = ActionAgent::new(
            "count",
            class,
            store.clone(),
            keynodes.clone(),
            move |_: &ActionContext<'_>| {
                runs_in_body.fetch_add(1, Ordering::SeqCst);
                ResultCode::Ok
            },
        );
        let command = create_command(store.as_ref(), &keynodes, class, &[]).unwrap();
        store
            .create_edge(ElementType::EdgeAccess, keynodes.command_in_progress(), command)
            .unwrap();
        let edge = signal(&store, &keynodes, command);

        let code = agent.dispatch(keynodes.command_initiated(), edge).unwrap();

        assert_eq!(code, ResultCode::Error);
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(
            get_command_result_addr(store.as_ref(), &keynodes, command),
            Addr::Invalid
        );
    }

    #[test]
    fn test_progress_erased_by_body_is_fatal() {
        let (store, keynodes, class) = setup();
        let agent = ActionAgent::new(
            "saboteur",
            class,
            store.clone(),
            keynodes.clone(),
            |ctx: &ActionContext<'_>| {
                for m in ctx.store.iter3(
                    ctx.keynodes.command_in_progress(),
                    ElementType::EdgeAccess,
                    TypeFilter::Any,
                ) {
                    ctx.store.erase_element(m.edge);
                }
                ResultCode::Ok
            },
        );
        let command = create_command(store.as_ref(), &keynodes, class, &[]).unwrap();
        let edge = signal(&store, &keynodes, command);

        let err = agent.dispatch(keynodes.command_initiated(), edge).unwrap_err();

        assert_eq!(err.kind(), sc_core::ExErrorKind::FatalInvariant);
        assert_eq!(err.element(), Some(command));
        assert!(err.request_id().is_some());
    }
}
