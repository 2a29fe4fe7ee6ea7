//! # Interaction Plugin CLI
//!
//! Process entry point a workflow host uses to talk to the plugin. Requests
//! are read as JSON from a file or stdin and every reply is printed to stdout
//! as a single JSON document; logs go to stderr.

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use interaction_plugin::logging::init_structured_logging;
use interaction_plugin::models::{
    parse_timeout, Action, ActionParam, AlertHandlerRequest, ExecuteTaskRequest, Execution,
    ExecutionStep, PluginReply,
};
use interaction_plugin::test_helpers::{HumanDecision, InMemoryStatusService};
use interaction_plugin::{
    ActionPlugin, ConfigLoader, HttpStatusService, InteractionPlugin, PluginConfig,
    INTERACTION_DESCRIPTOR,
};

#[derive(Parser, Debug)]
#[command(name = "interaction-plugin")]
#[command(about = "Workflow action that waits for a human to approve or reject a step")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path (default: config/interaction.toml or INTERACTION_CONFIG_PATH)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment name used to pick the configuration overlay
    #[arg(short, long)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the plugin descriptor
    Info,

    /// Run the interaction action for one step
    Execute {
        /// JSON request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        request: String,
    },

    /// Hand an alert to the plugin
    Alert {
        /// JSON request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        request: String,
    },

    /// Run a step against an in-memory status service with a scripted decision
    Simulate {
        /// Value of the Timeout parameter, in seconds
        #[arg(short, long, default_value = "0")]
        timeout: String,
        /// What the simulated human does
        #[arg(short, long, value_enum, default_value = "approve")]
        decision: SimulatedDecision,
        /// Seconds before the simulated human acts
        #[arg(short, long, default_value = "3")]
        after: u64,
        /// Seconds between two reads of the step
        #[arg(short, long, default_value = "1")]
        poll_interval: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SimulatedDecision {
    Approve,
    Reject,
    /// Nobody acts; only the timeout can end the wait
    None,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(environment) = &cli.environment {
        loader = loader.with_environment(environment);
    }
    let config = loader.load().context("failed to load configuration")?;

    init_structured_logging(&config.logging);

    match cli.command {
        Commands::Info => {
            print_json(&INTERACTION_DESCRIPTOR)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Execute { request } => execute(&config, &request).await,
        Commands::Alert { request } => {
            let request: AlertHandlerRequest = read_request(&request)?;
            let plugin = http_plugin(&config)?;
            reply(plugin.handle_alert(&request).await.into())
        }
        Commands::Simulate {
            timeout,
            decision,
            after,
            poll_interval,
        } => simulate(&timeout, decision, after, poll_interval).await,
    }
}

async fn execute(config: &PluginConfig, request: &str) -> Result<ExitCode> {
    let request: ExecuteTaskRequest = read_request(request)?;
    let plugin = http_plugin(config)?;

    info!(
        execution_id = %request.execution.id,
        step_id = %request.step.id,
        status_service = %config.status_service.base_url,
        "Executing interaction step"
    );

    reply(plugin.execute_task(&request).await.into())
}

async fn simulate(
    timeout: &str,
    decision: SimulatedDecision,
    after: u64,
    poll_interval: u64,
) -> Result<ExitCode> {
    let scripted = scripted_decision(timeout, decision)?;

    let service = Arc::new(InMemoryStatusService::new());
    let action = Action::with_params(vec![ActionParam::new("Timeout", timeout)]);
    let request = ExecuteTaskRequest {
        execution: Execution::new(Uuid::new_v4()),
        step: ExecutionStep::new(Uuid::new_v4(), action),
    };
    service.insert_step(request.execution.id, request.step.clone());

    if let Some(scripted) = scripted {
        service.schedule_decision(request.step.id, Duration::from_secs(after), scripted);
    }

    let plugin = InteractionPlugin::new(service.clone())
        .with_poll_interval(Duration::from_secs(poll_interval.max(1)));
    let result = plugin.execute_task(&request).await;

    if let Some(step) = service.step(request.step.id) {
        for message in &step.messages {
            info!(step_id = %step.id, "{message}");
        }
    }

    reply(result.into())
}

/// Map the CLI decision onto a scripted one. A run with nobody acting and
/// no timeout could never end, so it is refused.
fn scripted_decision(timeout: &str, decision: SimulatedDecision) -> Result<Option<HumanDecision>> {
    match decision {
        SimulatedDecision::Approve => Ok(Some(HumanDecision::Approve)),
        SimulatedDecision::Reject => Ok(Some(HumanDecision::Reject)),
        SimulatedDecision::None if parse_timeout(timeout) == 0 => bail!(
            "--decision none needs a positive --timeout, otherwise the simulation never ends"
        ),
        SimulatedDecision::None => Ok(None),
    }
}

fn http_plugin(config: &PluginConfig) -> Result<InteractionPlugin<HttpStatusService>> {
    let service = HttpStatusService::new(&config.status_service)
        .context("failed to build status service client")?;
    Ok(InteractionPlugin::from_config(service, &config.interaction))
}

fn read_request<T: serde::de::DeserializeOwned>(source: &str) -> Result<T> {
    let raw = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read request file {source}"))?
    };

    serde_json::from_str(&raw).context("request is not valid JSON for this command")
}

fn reply(reply: PluginReply) -> Result<ExitCode> {
    print_json(&reply)?;
    Ok(if reply.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
