use colored::Colorize;
use zoneflow_api::ApiClient;
use zoneflow_core::AccountOps;

use super::print_json;
use crate::AccountCommands;

pub async fn handle(cmd: AccountCommands, client: &ApiClient) -> anyhow::Result<()> {
    match cmd {
        AccountCommands::Info { name, json } => {
            let outcome = AccountOps::new(client).info(&name).await?;
            if json {
                return print_json(&outcome);
            }
            match &outcome.account {
                Some(account) => {
                    println!("{} ({})", account.name.cyan().bold(), account.id);
                    if let Some(kind) = &account.account_type {
                        println!("  type: {}", kind);
                    }
                    if let Some(created) = &account.created_on {
                        println!("  created: {}", created);
                    }
                }
                None => {
                    println!("{}", format!("Account '{}' does not exist", name).yellow());
                }
            }
        }
    }

    Ok(())
}
