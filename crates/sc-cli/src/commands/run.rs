//! Run command
//!
//! Usage: sc-cli run --class <IDTF> [--param <TEXT>]... [--body fixed|echo] [--result <CODE>]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use serde::Serialize;

use sc_agent::{
    command_state, create_command, get_command_result_addr, get_command_result_code,
    initiate_command, ActionAgent, ActionBody, ActionContext, CommandState, Dispatcher,
};
use sc_core::utils::read_string;
use sc_core::{Addr, ElementType, GraphStore, MemoryStore, ResultCode, TypeFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BodyKind {
    /// Answer with `--result`
    Fixed,
    /// Copy the first parameter into the result struct
    Echo,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// System identifier of the command class
    #[arg(long, default_value = "demo_command")]
    pub class: String,

    /// Parameter content, stored as a link (repeatable, in order)
    #[arg(long = "param")]
    pub params: Vec<String>,

    #[arg(long, value_enum, default_value = "fixed")]
    pub body: BodyKind,

    /// Result code for the fixed body, e.g. `ok` or `sc_result_error_io`
    #[arg(long, default_value = "ok")]
    pub result: String,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    command: Option<u64>,
    state: CommandState,
    result: Option<u64>,
    result_code: ResultCode,
    handled: usize,
    unhandled: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    echo: Option<String>,
}

struct FixedResultBody(ResultCode);

impl ActionBody for FixedResultBody {
    fn execute(&self, _ctx: &ActionContext<'_>) -> ResultCode {
        self.0
    }
}

struct EchoBody;

impl ActionBody for EchoBody {
    fn execute(&self, ctx: &ActionContext<'_>) -> ResultCode {
        let Some(text) = read_string(ctx.store, ctx.param(0)) else {
            return ResultCode::ErrorInvalidParams;
        };
        let copied = ctx
            .store
            .create_link(&text)
            .and_then(|link| ctx.store.create_edge(ElementType::EdgeAccess, ctx.result, link));
        match copied {
            Ok(_) => ResultCode::Ok,
            Err(e) => {
                tracing::warn!(error = %e, "echo failed");
                ResultCode::ErrorIo
            }
        }
    }
}

/// Execute run command
pub fn execute(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let code: ResultCode = args.result.parse()?;
    let config = super::load_config(args.config.as_deref())?;

    let store = Arc::new(MemoryStore::new());
    let keynodes = Arc::new(sc_agent::initialize(store.as_ref(), &config)?);

    let class = store.create_node(ElementType::NodeClass)?;
    store.set_idtf(class, &args.class)?;
    let params = args
        .params
        .iter()
        .map(|text| store.create_link(text))
        .collect::<Result<Vec<Addr>, _>>()?;

    let command = create_command(store.as_ref(), &keynodes, class, &params)?;
    initiate_command(store.as_ref(), &keynodes, command)?;

    let mut dispatcher = Dispatcher::new(store.clone(), keynodes.clone());
    match args.body {
        BodyKind::Fixed => dispatcher.register(ActionAgent::new(
            args.class.clone(),
            class,
            store.clone(),
            keynodes.clone(),
            FixedResultBody(code),
        )),
        BodyKind::Echo => dispatcher.register(ActionAgent::new(
            args.class.clone(),
            class,
            store.clone(),
            keynodes.clone(),
            EchoBody,
        )),
    }
    let pumped = dispatcher.pump()?;

    let result = get_command_result_addr(store.as_ref(), &keynodes, command);
    let echo = store
        .iter3(result, ElementType::EdgeAccess, TypeFilter::Exact(ElementType::Link))
        .first()
        .and_then(|m| read_string(store.as_ref(), m.target));
    let report = RunReport {
        command: command.id().map(|id| id.get()),
        state: command_state(store.as_ref(), &keynodes, command),
        result: result.id().map(|id| id.get()),
        result_code: get_command_result_code(store.as_ref(), &keynodes, command)?,
        handled: pumped.handled,
        unhandled: pumped.unhandled,
        echo,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Command {}:", command);
        println!("  state: {}", report.state);
        println!("  result: {}", result);
        println!("  result_code: {}", report.result_code);
        if let Some(echo) = &report.echo {
            println!("  echo: {}", echo);
        }
    }

    Ok(())
}
