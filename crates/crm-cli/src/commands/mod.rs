pub mod profile;
pub mod resources;
pub mod session;

use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use crm_application::{
    AdminConsole, AutoConfirmer, ChannelConfirmer, ChannelNotifier, GateDecision, Interaction,
};
use crm_core::interaction::{Confirmer, Notice};
use crm_core::resource::ResourceKind;
use crm_infrastructure::{ClientConfig, CrmPaths};

/// Builds the console. Confirmations are read from stdin unless `auto_confirm` is set.
pub fn open_console(
    config: &ClientConfig,
    paths: &CrmPaths,
    auto_confirm: bool,
) -> Result<(AdminConsole, UnboundedReceiver<Notice>)> {
    let confirmer: Arc<dyn Confirmer> = if auto_confirm {
        Arc::new(AutoConfirmer)
    } else {
        let (confirmer, mut requests) = ChannelConfirmer::new();
        tokio::spawn(async move {
            while let Some(request) = requests.recv().await {
                let message = request.prompt.message.clone();
                let approved = tokio::task::spawn_blocking(move || ask(&message))
                    .await
                    .unwrap_or(false);
                request.respond(approved);
            }
        });
        Arc::new(confirmer)
    };
    let (notifier, notices) = ChannelNotifier::new();

    let console = AdminConsole::from_config(
        config,
        paths,
        Interaction::new(confirmer, Arc::new(notifier)),
    )
    .context("Failed to set up the admin console")?;
    Ok((console, notices))
}

fn ask(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Reads one line from stdin after printing `label`.
pub async fn prompt_line(label: &str) -> Result<String> {
    let label = label.to_string();
    tokio::task::spawn_blocking(move || -> Result<String> {
        eprint!("{label}");
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await
    .context("Prompt task failed")?
}

/// Restores the session and checks that the screen for `kind` may be shown.
pub async fn enter_screen(console: &AdminConsole, kind: ResourceKind) -> Result<()> {
    let path = console.routes().screen_path(kind);
    require_session(console, &path).await
}

/// Restores the session and checks that `path` may be shown.
pub async fn require_session(console: &AdminConsole, path: &str) -> Result<()> {
    console.boot().await;
    match console.gate().settle(path).await {
        GateDecision::Render => Ok(()),
        GateDecision::Placeholder => bail!("Session is still being validated; try again"),
        GateDecision::Redirect { .. } => {
            bail!("Not signed in. Run `crm-admin login <email>` first.")
        }
    }
}

pub fn print_notices(notices: &mut UnboundedReceiver<Notice>) {
    while let Ok(notice) = notices.try_recv() {
        match notice {
            Notice::Created { kind, id } => println!("✅ Created {kind} {id}"),
            Notice::Updated { kind, id } => println!("✅ Updated {kind} {id}"),
            Notice::Removed { kind, id } => println!("🗑  Removed {kind} {id}"),
            Notice::MutationFailed { kind, error } => {
                eprintln!("❌ Could not change {kind}: {error}")
            }
            Notice::SessionExpired => {
                eprintln!("⚠️  Your session has expired. Sign in again with `crm-admin login`.")
            }
        }
    }
}
