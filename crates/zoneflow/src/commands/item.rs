use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_config::ZoneflowConfig;
use zoneflow_core::ItemOps;

use super::{account_name, print_json, read_json_arg};
use crate::ItemCommands;

pub async fn handle(
    cmd: ItemCommands,
    client: &ApiClient,
    config: &ZoneflowConfig,
) -> anyhow::Result<()> {
    match cmd {
        ItemCommands::Ensure {
            list,
            account,
            kind,
            item,
            dry_run,
            json,
        } => {
            let account = account_name(account, config)?;
            let item = read_json_arg(&item)?;
            let outcome = ItemOps::new(client)
                .ensure(&account, &list, kind, &item, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Item applied to list {}", "✓".green().bold(), list.cyan());
                println!("  {}", outcome.item);
            } else if dry_run {
                println!("{} Read-only pass, nothing applied", "dry run:".yellow());
            } else {
                println!("Item already matches in list {}", list.cyan());
            }
        }
        ItemCommands::Remove {
            list,
            account,
            kind,
            item,
            dry_run,
            json,
        } => {
            let account = account_name(account, config)?;
            let item = read_json_arg(&item)?;
            let outcome = ItemOps::new(client)
                .remove(&account, &list, kind, &item, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Item deleted from list {}", "✓".green().bold(), list.cyan());
            } else if dry_run {
                println!("{} Read-only pass, nothing deleted", "dry run:".yellow());
            } else {
                println!("No matching item in list {}, nothing to do", list.cyan());
            }
        }
    }

    Ok(())
}
