//! Accounts command - manage feed-to-ledger account mappings

use anyhow::Result;
use clap::Subcommand;
use ledgerlink_core::config::Config;

use crate::output;

use super::get_data_dir;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List configured account mappings
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Map a feed account to a ledger account
    Map {
        /// Feed-side account id
        source_account: String,
        /// Ledger account identifier
        ledger_account: String,
    },

    /// Remove a mapping
    Unmap {
        /// Feed-side account id
        source_account: String,
    },
}

pub fn run(command: AccountCommands) -> Result<()> {
    let data_dir = get_data_dir();
    std::fs::create_dir_all(&data_dir)?;

    match command {
        AccountCommands::List { json } => {
            let config = Config::load(&data_dir)?;

            if json {
                let map: std::collections::BTreeMap<&str, &str> =
                    config.account_mappings.iter().collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
                return Ok(());
            }

            if config.account_mappings.is_empty() {
                output::warning("No account mappings configured. Use 'llk accounts map'.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Feed account", "Ledger account"]);
            let mut rows: Vec<(&str, &str)> = config.account_mappings.iter().collect();
            rows.sort_unstable();
            for (source, ledger) in rows {
                table.add_row(vec![source, ledger]);
            }
            println!("{table}");
        }
        AccountCommands::Map {
            source_account,
            ledger_account,
        } => {
            let mut config = Config::load(&data_dir)?;
            config
                .account_mappings
                .insert(source_account.clone(), ledger_account.clone());
            config.save(&data_dir)?;
            output::success(&format!("Mapped {source_account} -> {ledger_account}"));
        }
        AccountCommands::Unmap { source_account } => {
            let mut config = Config::load(&data_dir)?;
            match config.account_mappings.remove(&source_account) {
                Some(ledger) => {
                    config.save(&data_dir)?;
                    output::success(&format!("Removed mapping {source_account} -> {ledger}"));
                }
                None => {
                    output::warning(&format!("No mapping for {source_account}"));
                }
            }
        }
    }

    Ok(())
}
