use chainlink_ledger::{Block, ChainSummary, Journey, VerificationReport};
use chrono::Duration;
use colored::Colorize;

const RULE_WIDTH: usize = 80;

pub fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

fn hours(elapsed: Duration) -> f64 {
    elapsed.num_seconds() as f64 / 3600.0
}

fn days_and_hours(total: Duration) -> String {
    let days = total.num_days();
    let hours = total.num_hours() - days * 24;
    format!("{days} days, {hours} hours")
}

/// Text renderer for blocks, journeys, and reports.
pub struct Renderer {
    preview: usize,
}

impl Renderer {
    pub fn new(preview: usize) -> Self {
        Self { preview }
    }

    fn hash(&self, block_hash: &chainlink_types::BlockHash) -> String {
        format!("{}...", block_hash.preview(self.preview))
    }

    /// Three-line overview used by `log`.
    pub fn block_line(&self, block: &Block) -> String {
        [
            format!(
                "{} Order #{}",
                format!("Block {}:", block.index).yellow().bold(),
                block.payload.order_id
            ),
            format!(
                "  Location: {} | Action: {}",
                block.payload.location, block.payload.action
            ),
            format!(
                "  Hash: {} | Previous: {}",
                self.hash(&block.hash).dimmed(),
                self.hash(&block.previous_hash).dimmed()
            ),
        ]
        .join("\n")
    }

    /// Every field of a block, full hashes included.
    pub fn block_detail(&self, block: &Block) -> String {
        let mut lines = vec![
            format!("{}", format!("Block {}", block.index).yellow().bold()),
            format!("  Timestamp:     {}", block.timestamp.to_rfc3339()),
            format!("  Order:         #{}", block.payload.order_id),
            format!("  Location:      {}", block.payload.location),
            format!("  Actor:         {}", block.payload.actor),
            format!("  Action:        {}", block.payload.action),
        ];
        for (key, value) in &block.payload.details {
            lines.push(format!("  {:<15}{}", format!("{key}:"), value));
        }
        lines.push(format!("  Hash:          {}", block.hash.to_hex().cyan()));
        lines.push(format!("  Previous hash: {}", block.previous_hash.to_hex().cyan()));
        lines.join("\n")
    }

    pub fn journey(&self, journey: &Journey) -> String {
        if journey.is_empty() {
            return format!("No blocks found for Order #{}", journey.order_id);
        }

        let mut lines = vec![
            rule('='),
            format!("ORDER #{} - COMPLETE JOURNEY", journey.order_id)
                .bold()
                .to_string(),
            rule('='),
        ];
        for stop in &journey.stops {
            let block = &stop.block;
            lines.push(String::new());
            lines.push(format!("{}", format!("Block {}", block.index).yellow().bold()));
            lines.push(format!(
                "   Timestamp:     {}",
                block.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
            lines.push(format!("   Time elapsed:  {:.1} hours", hours(stop.elapsed)));
            lines.push(format!("   Location:      {}", block.payload.location));
            lines.push(format!("   Actor:         {}", block.payload.actor));
            lines.push(format!("   Action:        {}", block.payload.action));
            if !block.payload.details.is_empty() {
                let details: Vec<String> = block
                    .payload
                    .details
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                lines.push(format!("   Details:       {}", details.join(", ")));
            }
            lines.push(format!("   Hash:          {}", self.hash(&block.hash)));
            lines.push(format!("   Previous hash: {}", self.hash(&block.previous_hash)));
        }
        lines.push(String::new());
        lines.push(rule('-'));
        lines.push(format!(
            "TOTAL DELIVERY TIME: {}",
            days_and_hours(journey.total_elapsed())
        ));
        lines.push(rule('='));
        lines.join("\n")
    }

    pub fn report(&self, report: &VerificationReport) -> String {
        let mut lines: Vec<String> = report
            .checks
            .iter()
            .map(|check| match check.reason {
                None => format!("  Block {:<4} {}", check.index, "✓ ok".green()),
                Some(reason) => format!("  Block {:<4} {}", check.index, format!("✗ {reason}").red()),
            })
            .collect();
        lines.push(banner(report));
        lines.join("\n")
    }

    pub fn summary(&self, summary: &ChainSummary) -> String {
        let integrity = if summary.valid {
            "VALID".green().bold()
        } else {
            "INVALID".red().bold()
        };
        [
            rule('='),
            "SUMMARY STATISTICS".bold().to_string(),
            rule('='),
            format!("Total blocks in chain: {}", summary.blocks),
            format!("Orders tracked:        {}", summary.orders),
            format!("Locations:             {}", summary.locations),
            format!("Chain integrity:       {integrity}"),
            rule('='),
        ]
        .join("\n")
    }
}

/// Pass/fail banner for a verification report.
pub fn banner(report: &VerificationReport) -> String {
    match report.first_failure {
        None => format!(
            "{}\n   All blocks are cryptographically linked and verified",
            "✓ CHAIN VALID - no tampering detected".green().bold()
        ),
        Some(index) => format!(
            "{}\n   {} of {} block(s) failed verification",
            format!("✗ CHAIN COMPROMISED - tampering detected at block {index}")
                .red()
                .bold(),
            report.failures().count(),
            report.checks.len()
        ),
    }
}
