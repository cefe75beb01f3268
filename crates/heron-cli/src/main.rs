use anyhow::{Context, Result};
use clap::Parser;

use heron::agent::{Agent, DEFAULT_MAX_TOOL_CYCLES};
use heron::developer::DeveloperSystem;
use heron::providers::configs::{XaiProviderConfig, DEFAULT_MAX_TOKENS};
use heron::providers::xai::XaiProvider;

mod commands;
mod presets;
mod session;

use presets::DEFAULT_MODEL;
use session::Session;

const SYSTEM_PROMPT: &str = "You are Grok, a helpful assistant running in a terminal session. \
You can operate on the user's machine through the provided tools: read_file, write_file, \
list_dir and bash. Use them whenever a request concerns local files or commands, and answer \
in plain text once you have what you need.";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// API key (can also be set via GROK_API_KEY or XAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// API host
    #[arg(long, default_value = "https://api.x.ai")]
    host: String,

    /// Token budget per response
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Maximum tool calls within one reply before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_TOOL_CYCLES)]
    max_tool_cycles: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.api_key {
        Some(api_key) => XaiProviderConfig::new(api_key),
        None => XaiProviderConfig::from_env().context(
            "API key must be provided via --api-key or the GROK_API_KEY / XAI_API_KEY environment variable",
        )?,
    };
    let config = XaiProviderConfig {
        host: cli.host,
        max_tokens: cli.max_tokens,
        ..config
    };

    let provider = XaiProvider::new(config)?;
    let mut agent = Agent::new(Box::new(provider), cli.model, SYSTEM_PROMPT)
        .with_max_tool_cycles(cli.max_tool_cycles);
    agent.add_system(Box::new(DeveloperSystem::new()));

    Session::new(agent).start().await
}
