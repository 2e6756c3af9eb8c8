use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::profile::ProfileAction;
use commands::resources::ResourceAction;
use crm_application::AdminConsole;
use crm_infrastructure::{ConfigLoader, CrmPaths};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "crm-admin")]
#[command(about = "CRM admin client - manage contacts, organizations and operators", long_about = None)]
struct Cli {
    /// Directory holding config.toml, the session file and logs
    #[arg(long, global = true, env = "CRM_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        /// Read from the prompt when omitted
        #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show or change your own profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage organizations
    Organizations {
        #[command(subcommand)]
        action: ResourceAction,
    },
    /// Manage operator accounts
    Users {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

impl Commands {
    fn skips_confirmation(&self) -> bool {
        match self {
            Commands::Contacts { action }
            | Commands::Organizations { action }
            | Commands::Users { action } => action.skips_confirmation(),
            _ => false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CrmPaths::resolve(cli.config_dir.as_deref())?;
    let _log_guard = logging::init(&paths.logs_dir(), cli.verbose)?;
    let config = ConfigLoader::new(&paths)
        .load()
        .with_context(|| format!("Failed to load {}", paths.config_file().display()))?;

    let (console, mut notices) =
        commands::open_console(&config, &paths, cli.command.skips_confirmation())?;
    let outcome = dispatch(&console, cli.command).await;
    commands::print_notices(&mut notices);
    outcome
}

async fn dispatch(console: &AdminConsole, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::session::login(console, &email, password).await
        }
        Commands::Logout => commands::session::logout(console).await,
        Commands::Whoami => commands::session::whoami(console).await,
        Commands::Profile { action } => commands::profile::run(console, action).await,
        Commands::Contacts { action } => {
            commands::resources::run(console, console.contacts(), action).await
        }
        Commands::Organizations { action } => {
            commands::resources::run(console, console.organizations(), action).await
        }
        Commands::Users { action } => {
            commands::resources::run(console, console.users(), action).await
        }
    }
}
