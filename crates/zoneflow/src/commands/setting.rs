use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_core::SettingOps;

use super::{parse_setting_value, print_json};
use crate::SettingCommands;

pub async fn handle(cmd: SettingCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        SettingCommands::Set {
            zone,
            setting,
            value,
            dry_run,
            json,
        } => {
            let requested = parse_setting_value(&value)?;
            let outcome = SettingOps::new(client)
                .set(&zone, setting, &requested, dry_run)
                .await?;
            if json {
                return print_json(&outcome);
            }
            if outcome.changed {
                println!(
                    "{} Updated {} on {}",
                    "✓".green().bold(),
                    setting.as_str().cyan(),
                    zone
                );
                println!("  value: {}", outcome.setting.value);
            } else if dry_run {
                println!(
                    "{} Current value of {}: {}",
                    "dry run:".yellow(),
                    setting.as_str().cyan(),
                    outcome.setting.value
                );
            } else {
                println!("Setting {} already matches", setting.as_str().cyan());
            }
        }
        SettingCommands::Get { zone, setting, json } => {
            let outcome = SettingOps::new(client).get(&zone, setting).await?;
            if json {
                return print_json(&outcome);
            }
            println!("{}: {}", setting.as_str().cyan(), outcome.setting.value);
        }
    }

    Ok(())
}
