use anyhow::{Result, bail};

use super::prompt_line;
use crm_application::AdminConsole;
use crm_core::AuthError;
use crm_core::session::SessionStatus;

pub async fn login(console: &AdminConsole, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_line("Password: ").await?,
    };

    match console.session().login(email, &password).await {
        Ok(user) => {
            println!("✅ Signed in as {} <{}>", user.display_name(), user.email);
            Ok(())
        }
        Err(AuthError::IllegalTransition { .. }) => {
            bail!("Already signed in. Run `crm-admin logout` first.")
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(console: &AdminConsole) -> Result<()> {
    console.session().logout().await;
    println!("👋 Signed out");
    Ok(())
}

pub async fn whoami(console: &AdminConsole) -> Result<()> {
    match console.boot().await {
        SessionStatus::Authenticated => {
            if let Some(user) = console.session().current_user() {
                let role = if user.is_owner { "owner" } else { "admin" };
                println!("{} <{}> ({role}, id {})", user.display_name(), user.email, user.id);
            }
        }
        SessionStatus::Invalid => println!("Session expired. Sign in again."),
        SessionStatus::Anonymous | SessionStatus::Authenticating => println!("Not signed in."),
    }
    Ok(())
}
