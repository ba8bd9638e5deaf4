use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "chainlink",
    about = "Chainlink: hash-chained order event ledger with tamper detection",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Chain snapshot file (overrides the config file)
    #[arg(long, global = true)]
    pub chain: Option<PathBuf>,

    /// Config file (defaults to ./chainlink.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the two-order tracking simulation with a tampering demonstration
    Demo(DemoArgs),
    /// Create a new chain file holding only the genesis block
    Init(InitArgs),
    /// Append an order event
    Append(AppendArgs),
    /// Verify chain integrity
    Verify(VerifyArgs),
    /// Show the journey of one order
    Journey(JourneyArgs),
    /// List all blocks
    Log(LogArgs),
    /// Show one block in full
    Show(ShowArgs),
    /// Overwrite a block field without rehashing (demonstration only)
    Tamper(TamperArgs),
}

#[derive(Args)]
pub struct DemoArgs {
    /// Write the final demo chain to the chain file
    #[arg(long)]
    pub save: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Replace an existing chain file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AppendArgs {
    #[arg(long = "order")]
    pub order_id: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long)]
    pub actor: String,
    #[arg(long)]
    pub action: String,
    /// Extra detail as KEY=VALUE (repeatable)
    #[arg(long = "detail", value_parser = parse_detail)]
    pub details: Vec<(String, String)>,
    /// Event time as RFC 3339 (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Args)]
pub struct VerifyArgs {}

#[derive(Args)]
pub struct JourneyArgs {
    pub order_id: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Show only the last N blocks
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ShowArgs {
    pub index: u64,
}

#[derive(Args)]
pub struct TamperArgs {
    pub index: u64,
    /// order_id, location, actor, action, timestamp, previous_hash, or details.<key>
    pub field: String,
    pub value: String,
}

fn parse_detail(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
