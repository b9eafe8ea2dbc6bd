use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_core::{RulesetOps, ScopeSelector};

use super::print_json;
use crate::RulesetCommands;

pub async fn handle(cmd: RulesetCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        RulesetCommands::Ensure {
            name,
            account_id,
            zone,
            phase,
            kind,
            description,
            dry_run,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let outcome = RulesetOps::new(client)
                .ensure(&scope, &name, kind, phase, description.as_deref(), dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!(
                    "{} Created ruleset {} in phase {}",
                    "✓".green().bold(),
                    name.cyan(),
                    phase.as_str()
                );
            } else if outcome.ruleset.is_some() {
                println!("Ruleset {} is already present", name.cyan());
            } else {
                println!("{} Would create ruleset {}", "dry run:".yellow(), name.cyan());
            }
        }
        RulesetCommands::Remove {
            name,
            account_id,
            zone,
            dry_run,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let outcome = RulesetOps::new(client).remove(&scope, &name, dry_run).await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!("{} Deleted ruleset {}", "✓".green().bold(), name.cyan());
            } else if outcome.ruleset.is_some() {
                println!("{} Would delete ruleset {}", "dry run:".yellow(), name.cyan());
            } else {
                println!("Ruleset {} is not there, nothing to do", name.cyan());
            }
        }
        RulesetCommands::Info {
            name,
            account_id,
            zone,
            phase,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let outcome = RulesetOps::new(client).info(&scope, &name, phase).await?;
            if json {
                return print_json(&outcome);
            }
            match &outcome.ruleset {
                Some(ruleset) => {
                    println!("{} ({})", ruleset.name.cyan().bold(), ruleset.id);
                    println!("  kind: {}", ruleset.kind);
                    println!("  phase: {}", ruleset.phase);
                    if let Some(description) = &ruleset.description {
                        println!("  description: {}", description);
                    }
                    let rules = ruleset.rules.as_deref().unwrap_or_default();
                    println!("  rules: {}", rules.len());
                    for rule in rules {
                        println!(
                            "    - {} ({})",
                            rule.rule_ref.as_deref().unwrap_or("(no ref)"),
                            rule.action.as_deref().unwrap_or("no action"),
                        );
                    }
                }
                None => {
                    println!(
                        "{}",
                        format!("No ruleset named '{}' in phase {}", name, phase).yellow()
                    );
                }
            }
        }
    }

    Ok(())
}
