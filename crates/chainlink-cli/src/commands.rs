use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context as _};
use chainlink_ledger::{snapshot, BlockField, Chain};
use chainlink_types::OrderEvent;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::cli::*;
use crate::config::CliConfig;
use crate::demo;
use crate::render::{banner, rule, Renderer};

/// Resolved settings shared by every command.
pub struct Context {
    pub chain_path: PathBuf,
    pub format: OutputFormat,
    pub renderer: Renderer,
}

impl Context {
    pub fn new(cli: &Cli, config: &CliConfig) -> Self {
        Self {
            chain_path: cli
                .chain
                .clone()
                .unwrap_or_else(|| config.chain_path.clone()),
            format: cli.format,
            renderer: Renderer::new(config.hash_preview_len),
        }
    }

    fn load(&self) -> anyhow::Result<Chain> {
        snapshot::load(&self.chain_path)
            .with_context(|| format!("loading chain from {}", self.chain_path.display()))
    }

    fn save(&self, chain: &Chain) -> anyhow::Result<()> {
        snapshot::save(&self.chain_path, chain)
            .with_context(|| format!("saving chain to {}", self.chain_path.display()))
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_command(cli: Cli, ctx: &Context) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Demo(args) => cmd_demo(ctx, args),
        Command::Init(args) => cmd_init(ctx, args),
        Command::Append(args) => cmd_append(ctx, args),
        Command::Verify(_) => cmd_verify(ctx),
        Command::Journey(args) => cmd_journey(ctx, args),
        Command::Log(args) => cmd_log(ctx, args),
        Command::Show(args) => cmd_show(ctx, args),
        Command::Tamper(args) => cmd_tamper(ctx, args),
    }
}

fn cmd_demo(ctx: &Context, args: DemoArgs) -> anyhow::Result<ExitCode> {
    let r = &ctx.renderer;
    let mut chain = demo::build_chain(Utc::now()).context("building demo chain")?;

    println!("{}", rule('='));
    println!("{}", "CHAINLINK OPERATIONS SYSTEM - DEMONSTRATION".bold());
    println!("Hash-chained order tracking across offices and warehouses");
    println!("{}\n", rule('='));

    for order_id in chain.order_ids() {
        println!("{}\n", r.journey(&chain.journey(&order_id)));
    }

    println!("{}", "CHAIN VALIDATION".bold());
    println!("{}", rule('='));
    println!("{}\n", banner(&chain.report()));

    println!("{}", "TAMPERING DETECTION DEMONSTRATION".bold());
    println!("{}", rule('='));
    println!(
        "Attempting to modify block {} (logistics dispatch for order #12345)...",
        demo::TAMPERED_BLOCK
    );
    let original = chain.tamper(demo::TAMPERED_BLOCK, BlockField::Action, "PACKAGE LOST")?;
    println!("  Modified: '{}' → '{}'\n", original, "PACKAGE LOST".red());
    println!("{}\n", r.report(&chain.report()));

    chain.tamper(demo::TAMPERED_BLOCK, BlockField::Action, &original)?;
    println!("Block {} restored to its original value", demo::TAMPERED_BLOCK);
    println!("{}\n", banner(&chain.report()));

    println!("{}", r.summary(&chain.summary()));

    if args.save {
        ctx.save(&chain)?;
        println!("Demo chain written to {}", ctx.chain_path.display().to_string().bold());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_init(ctx: &Context, args: InitArgs) -> anyhow::Result<ExitCode> {
    if ctx.chain_path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to replace it",
            ctx.chain_path.display()
        );
    }
    let chain = Chain::initialize();
    ctx.save(&chain)?;

    if ctx.json() {
        print_json(chain.genesis())?;
    } else {
        println!(
            "{} Initialized chain in {}",
            "✓".green().bold(),
            ctx.chain_path.display().to_string().bold()
        );
        println!("  Genesis: {}", chain.genesis().hash.to_hex().cyan());
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_append(ctx: &Context, args: AppendArgs) -> anyhow::Result<ExitCode> {
    let mut chain = ctx.load()?;

    let mut event = OrderEvent::new(args.order_id, args.location, args.actor, args.action);
    event.details.extend(args.details);
    if let Some(at) = &args.at {
        let ts = DateTime::parse_from_rfc3339(at)
            .with_context(|| format!("parsing --at `{at}` as RFC 3339"))?;
        event = event.at(ts.with_timezone(&Utc));
    }

    let block = chain.append(event)?;
    ctx.save(&chain)?;

    if ctx.json() {
        print_json(&block)?;
    } else {
        println!("{} Appended block {}", "✓".green().bold(), block.index);
        println!("{}", ctx.renderer.block_line(&block));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_verify(ctx: &Context) -> anyhow::Result<ExitCode> {
    let chain = ctx.load()?;
    let report = chain.report();

    if ctx.json() {
        print_json(&report)?;
    } else {
        println!("{}", ctx.renderer.report(&report));
    }
    Ok(if report.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_journey(ctx: &Context, args: JourneyArgs) -> anyhow::Result<ExitCode> {
    let chain = ctx.load()?;
    let journey = chain.journey(&args.order_id);

    if ctx.json() {
        print_json(&journey)?;
    } else {
        println!("{}", ctx.renderer.journey(&journey));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_log(ctx: &Context, args: LogArgs) -> anyhow::Result<ExitCode> {
    let chain = ctx.load()?;
    let blocks = chain.blocks();
    let shown = match args.limit {
        Some(n) => &blocks[blocks.len().saturating_sub(n)..],
        None => blocks,
    };

    if ctx.json() {
        print_json(shown)?;
    } else {
        for block in shown {
            println!("{}", ctx.renderer.block_line(block));
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> anyhow::Result<ExitCode> {
    let chain = ctx.load()?;
    let block = chain.get(args.index)?;

    if ctx.json() {
        print_json(block)?;
    } else {
        println!("{}", ctx.renderer.block_detail(block));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_tamper(ctx: &Context, args: TamperArgs) -> anyhow::Result<ExitCode> {
    let mut chain = ctx.load()?;
    let field: BlockField = args.field.parse()?;
    let previous = chain.tamper(args.index, field.clone(), &args.value)?;
    ctx.save(&chain)?;

    println!(
        "{} Block {} {}: '{}' → '{}' (hash not recomputed)",
        "!".yellow().bold(),
        args.index,
        field,
        previous,
        args.value.red()
    );
    println!("  Run `chainlink verify` to see the detection.");
    Ok(ExitCode::SUCCESS)
}
