#![allow(clippy::unwrap_used, clippy::expect_used)]

// Boundary events emitted by protocol operations.

mod common;

use common::{world, world_with_ordinals};
use sc_agent::{create_command, initiate_command};
use sc_core::logging_facility::test_capture::init_test_capture;
use sc_core::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use sc_core::{GraphStore, ResultCode};

#[test]
fn test_dispatch_emits_start_and_end_with_result_code() {
    // GIVEN a capture layer and a dispatchable command
    let capture = init_test_capture();
    let w = world();
    let class = w.class("logged_class");
    let agent = w.fixed_agent(class, ResultCode::Ok);
    let command = create_command(w.store.as_ref(), &w.keynodes, class, &[]).unwrap();
    initiate_command(w.store.as_ref(), &w.keynodes, command).unwrap();

    // WHEN the agent dispatches it
    agent
        .dispatch(w.keynodes.command_initiated(), w.initiated_edge(command))
        .unwrap();

    // THEN a start/end pair sharing one request id was recorded
    let agent_name = "fixed_ok";
    let starts: Vec<_> = capture
        .find("dispatch", EVENT_START)
        .into_iter()
        .filter(|e| e.field("agent") == Some(agent_name))
        .collect();
    let ends: Vec<_> = capture
        .find("dispatch", EVENT_END)
        .into_iter()
        .filter(|e| e.field("agent") == Some(agent_name))
        .collect();
    assert!(!starts.is_empty());
    let request_id = starts[0].field("request_id").unwrap().to_string();
    assert!(ends
        .iter()
        .any(|e| e.field("request_id") == Some(request_id.as_str())
            && e.field("result_code") == Some("ok")));
}

#[test]
fn test_rejected_command_emits_error_event() {
    // GIVEN a registry that allows no parameters at all
    let capture = init_test_capture();
    let w = world_with_ordinals(1);
    let class = w.class("strict_class");
    let param = w.store.create_link("x").unwrap();

    // WHEN a command with one parameter is requested
    let err = create_command(w.store.as_ref(), &w.keynodes, class, &[param]).unwrap_err();

    // THEN the failure is logged with its stable code
    let errors = capture.count_events(|e| {
        e.field("op") == Some("create_command")
            && e.field("event") == Some(EVENT_END_ERROR)
            && e.field("err.code") == Some(err.code())
    });
    assert!(errors >= 1);
}
