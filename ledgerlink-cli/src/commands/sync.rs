//! Sync command - fetch the feed and reconcile it into the ledger

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub fn run(provider: Option<String>, dry_run: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let result = ctx.sync_service.sync(provider.as_deref(), dry_run)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if dry_run {
        println!("{}", "DRY RUN - No changes applied".yellow());
        println!();
    }

    println!("{} {}", "Synced:".green(), result.provider);
    println!("  Transaction breakdown:");
    println!("    Discovered: {}", result.stats.discovered);
    println!("    New: {}", result.stats.new);
    println!(
        "    Duplicates: {} (already in ledger)",
        result.stats.duplicates
    );
    println!(
        "    Settled provisionals: {} (overwritten and cleared)",
        result.stats.replaced
    );
    if result.stats.unmapped_skipped > 0 {
        println!(
            "    Skipped: {} (no account mapping)",
            result.stats.unmapped_skipped
        );
    }

    for skipped in &result.skipped {
        println!(
            "  {} {} on {} - {}",
            "Dropped:".yellow(),
            skipped.source_account_id,
            skipped.date,
            skipped.reason
        );
    }
    for warning in &result.warnings {
        println!("  {} {}", "Warning:".yellow(), warning);
    }

    if result.skipped.is_empty() && result.warnings.is_empty() && result.stats.discovered == 0 {
        println!();
        println!("{}", "Feed reported no transactions.".yellow());
    }

    Ok(())
}
