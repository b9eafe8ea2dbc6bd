use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_core::{RuleOps, RuleSelector, RuleSpec, ScopeSelector};

use super::{print_json, read_json_arg};
use crate::RuleCommands;

pub async fn handle(cmd: RuleCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        RuleCommands::Ensure {
            ruleset,
            rule_ref,
            account_id,
            zone,
            description,
            action,
            action_parameters,
            enabled,
            exposed_credential_check,
            expression,
            logging,
            position,
            ratelimit,
            dry_run,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let spec = RuleSpec {
                rule_ref: rule_ref.clone(),
                description,
                action,
                action_parameters: action_parameters.as_deref().map(read_json_arg).transpose()?,
                enabled,
                exposed_credential_check: exposed_credential_check
                    .as_deref()
                    .map(read_json_arg)
                    .transpose()?,
                expression,
                logging: logging.as_deref().map(read_json_arg).transpose()?,
                position: position.as_deref().map(read_json_arg).transpose()?,
                ratelimit: ratelimit.as_deref().map(read_json_arg).transpose()?,
            };
            let outcome = RuleOps::new(client).ensure(&scope, &ruleset, &spec, dry_run).await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!(
                    "{} Applied rule {} in ruleset {}",
                    "✓".green().bold(),
                    rule_ref.cyan(),
                    ruleset.cyan()
                );
            } else if dry_run {
                println!("{} Read-only pass, nothing applied", "dry run:".yellow());
            } else {
                println!("Rule {} already matches", rule_ref.cyan());
            }
        }
        RuleCommands::Remove {
            ruleset,
            rule_ref,
            account_id,
            zone,
            dry_run,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let outcome = RuleOps::new(client)
                .remove(&scope, &ruleset, &rule_ref, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!(
                    "{} Deleted rule {} from ruleset {}",
                    "✓".green().bold(),
                    rule_ref.cyan(),
                    ruleset.cyan()
                );
            } else if outcome.rule.is_some() {
                println!("{} Would delete rule {}", "dry run:".yellow(), rule_ref.cyan());
            } else {
                println!("Rule {} is not there, nothing to do", rule_ref.cyan());
            }
        }
        RuleCommands::Info {
            ruleset,
            account_id,
            zone,
            phase,
            rule_ref,
            description,
            json,
        } => {
            let scope = ScopeSelector::from_options(account_id, zone)?
                .resolve(client)
                .await?;
            let selector = RuleSelector::from_options(rule_ref, description)?;
            let outcome = RuleOps::new(client)
                .info(&scope, &ruleset, phase, &selector)
                .await?;
            if json {
                return print_json(&outcome);
            }
            match &outcome.rule {
                Some(rule) => {
                    println!(
                        "{} ({})",
                        rule.rule_ref.as_deref().unwrap_or("(no ref)").cyan().bold(),
                        rule.id.as_deref().unwrap_or("no id"),
                    );
                    if let Some(description) = &rule.description {
                        println!("  description: {}", description);
                    }
                    if let Some(action) = &rule.action {
                        println!("  action: {}", action);
                    }
                    if let Some(expression) = &rule.expression {
                        println!("  expression: {}", expression);
                    }
                    if let Some(enabled) = rule.enabled {
                        println!("  enabled: {}", enabled);
                    }
                }
                None => {
                    println!(
                        "{}",
                        format!("No matching rule in ruleset '{}'", ruleset).yellow()
                    );
                }
            }
        }
    }

    Ok(())
}
