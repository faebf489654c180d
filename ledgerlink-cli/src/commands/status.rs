//! Status command - ledger summary

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::output;

use super::get_context;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountSummary {
    records: usize,
    provisional: usize,
    balance_minor: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    total_records: usize,
    provisional_records: usize,
    accounts: BTreeMap<String, AccountSummary>,
}

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let snapshot = ctx.store.snapshot()?;

    let mut accounts: BTreeMap<String, AccountSummary> = BTreeMap::new();
    let mut provisional_records = 0;
    for record in &snapshot {
        let summary = accounts.entry(record.account.clone()).or_default();
        summary.records += 1;
        summary.balance_minor += record.amount;
        if !record.cleared {
            summary.provisional += 1;
            provisional_records += 1;
        }
    }

    let report = StatusReport {
        total_records: snapshot.len(),
        provisional_records,
        accounts,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.total_records == 0 {
        output::warning("Ledger is empty. Run 'llk sync' to import from the feed.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Account", "Records", "Pending", "Balance"]);
    for (account, summary) in &report.accounts {
        table.add_row(vec![
            account.clone(),
            summary.records.to_string(),
            summary.provisional.to_string(),
            output::format_minor_units(summary.balance_minor),
        ]);
    }
    println!("{table}");
    println!();
    output::success(&format!(
        "{} records ({} still provisional)",
        report.total_records, report.provisional_records
    ));

    Ok(())
}
