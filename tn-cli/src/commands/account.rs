//! Account activation commands.

use clap::Subcommand;
use console::style;

use tn_core::config::AppConfig;
use tn_core::error::TnResult;
use tn_store::ActiveAccount;
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show the signed-in account.
    Show,
    /// Make the given user id the signed-in account.
    Activate {
        /// User id, e.g. usrAbc123.
        uid: String,
    },
    /// Sign out of the current account.
    Logout,
}

pub fn run(config: &AppConfig, action: AccountAction, format: OutputFormat) -> TnResult<()> {
    let store = super::open_store(config)?;

    match action {
        AccountAction::Show => print_account(&store.active_account(), format),
        AccountAction::Activate { uid } => {
            let account = store.try_set_active_account(Some(&uid))?;
            print_account(&account, format);
        }
        AccountAction::Logout => {
            store.logout();
            match format {
                OutputFormat::Json => println!("{}", serde_json::json!({"uid": null})),
                OutputFormat::Text => println!("  {} Logged out.", style("OK").green().bold()),
            }
        }
    }

    Ok(())
}

fn print_account(account: &ActiveAccount, format: OutputFormat) {
    match (format, account.account()) {
        (OutputFormat::Json, Some(account)) => {
            println!("{}", serde_json::json!({
                "uid": account.uid,
                "id": account.id,
                "cred_methods": account.cred_methods,
                "device_id": account.device_id,
            }));
        }
        (OutputFormat::Json, None) => println!("{}", serde_json::json!({"uid": null})),
        (OutputFormat::Text, Some(account)) => {
            println!("  Active account:  {}", style(&account.uid).bold());
            if !account.cred_methods.is_empty() {
                println!("  Pending creds:   {}", account.cred_methods.join(", "));
            }
        }
        (OutputFormat::Text, None) => println!("  No account is signed in."),
    }
}
