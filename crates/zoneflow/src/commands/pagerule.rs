use anyhow::Context as _;
use colored::Colorize;
use zoneflow_api::{ApiClient, PageRuleAction};
use zoneflow_core::PageRuleOps;

use super::{print_json, read_json_arg};
use crate::PageruleCommands;

pub async fn handle(cmd: PageruleCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        PageruleCommands::Ensure {
            zone,
            target,
            actions,
            priority,
            disabled,
            dry_run,
            json,
        } => {
            let actions: Vec<PageRuleAction> = serde_json::from_value(read_json_arg(&actions)?)
                .context("Actions must be a JSON array of {id, value} objects")?;
            let outcome = PageRuleOps::new(client)
                .ensure(&zone, &target, actions, priority, !disabled, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                if outcome.old_rule.is_some() {
                    println!("{} Updated page rule for {}", "✓".green().bold(), target.cyan());
                } else {
                    println!("{} Created page rule for {}", "✓".green().bold(), target.cyan());
                }
            } else if dry_run {
                println!("{} Desired rule computed, nothing applied", "dry run:".yellow());
            } else {
                println!("Page rule for {} already matches", target.cyan());
            }
        }
        PageruleCommands::Remove {
            zone,
            target,
            dry_run,
            json,
        } => {
            let outcome = PageRuleOps::new(client).remove(&zone, &target, dry_run).await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Deleted page rule for {}", "✓".green().bold(), target.cyan());
            } else if outcome.old_rule.is_some() {
                println!(
                    "{} Would delete page rule for {}",
                    "dry run:".yellow(),
                    target.cyan()
                );
            } else {
                println!("No page rule for {}, nothing to do", target.cyan());
            }
        }
    }

    Ok(())
}
