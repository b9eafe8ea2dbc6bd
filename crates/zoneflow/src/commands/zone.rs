use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_core::ZoneOps;

use super::print_json;
use crate::ZoneCommands;

pub async fn handle(cmd: ZoneCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        ZoneCommands::Ensure {
            zone,
            account_id,
            zone_type,
            dry_run,
            json,
        } => {
            let outcome = ZoneOps::new(client)
                .ensure(&zone, &account_id, zone_type, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Created zone {}", "✓".green().bold(), zone.cyan());
            } else if outcome.zone.is_some() {
                println!("Zone {} is already present", zone.cyan());
            } else {
                println!("{} Would create zone {}", "dry run:".yellow(), zone.cyan());
            }
        }
        ZoneCommands::Remove { zone, dry_run, json } => {
            let outcome = ZoneOps::new(client).remove(&zone, dry_run).await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Deleted zone {}", "✓".green().bold(), zone.cyan());
            } else if outcome.zone.is_some() {
                println!("{} Would delete zone {}", "dry run:".yellow(), zone.cyan());
            } else {
                println!("Zone {} is not there, nothing to do", zone.cyan());
            }
        }
        ZoneCommands::Info { zone, json } => {
            let outcome = ZoneOps::new(client).info(&zone).await?;
            if json {
                return print_json(&outcome);
            }
            let z = &outcome.zone;
            println!("{} ({})", z.name.cyan().bold(), z.id);
            println!("  status: {}", z.status);
            println!("  type: {}", z.zone_type);
            println!("  account: {}", z.account.name);
            if !z.plan.name.is_empty() {
                println!("  plan: {}", z.plan.name);
            }
            if !z.name_servers.is_empty() {
                println!("  name servers: {}", z.name_servers.join(", "));
            }
            if z.paused {
                println!("  {}", "paused".yellow());
            }
        }
    }

    Ok(())
}
