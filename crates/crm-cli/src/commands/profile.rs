use anyhow::{Context, Result};
use clap::Subcommand;

use super::require_session;
use crm_application::AdminConsole;
use crm_core::session::ProfileDraft;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the signed-in operator's profile
    Show,
    /// Change the signed-in operator's profile; omitted fields keep their value
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// URL of the profile photo
        #[arg(long)]
        photo: Option<String>,
    },
}

pub async fn run(console: &AdminConsole, action: ProfileAction) -> Result<()> {
    let root = console.routes().protected_root.clone();
    require_session(console, &root).await?;
    let current = console
        .session()
        .current_user()
        .context("Signed-in session has no identity")?;

    match action {
        ProfileAction::Show => {
            println!("Id:     {}", current.id);
            println!("Name:   {}", current.display_name());
            println!("Email:  {}", current.email);
            println!("Owner:  {}", if current.is_owner { "yes" } else { "no" });
        }
        ProfileAction::Update {
            first_name,
            last_name,
            email,
            photo,
        } => {
            let draft = ProfileDraft {
                first_name: first_name.unwrap_or(current.first_name),
                last_name: last_name.unwrap_or(current.last_name),
                email: email.unwrap_or(current.email),
                photo,
            };
            let updated = console.session().update_profile(&draft).await?;
            println!("✅ Profile updated: {} <{}>", updated.display_name(), updated.email);
        }
    }
    Ok(())
}
