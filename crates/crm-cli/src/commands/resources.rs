use anyhow::{Result, bail};
use clap::Subcommand;

use super::enter_screen;
use crm_application::{AdminConsole, RemoveOutcome, ResourceListController};
use crm_core::resource::{
    AdminUser, Contact, FetchResolution, ListView, Organization, Resource, ResourceId,
};

#[derive(Subcommand)]
pub enum ResourceAction {
    /// List records, optionally filtered locally by a search term
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show one record
    Show { id: String },
    /// Delete one record
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl ResourceAction {
    pub fn skips_confirmation(&self) -> bool {
        matches!(self, Self::Delete { yes: true, .. })
    }
}

/// One-line rendering of a record for terminal output.
pub trait Summary {
    fn summary(&self) -> String;
}

impl Summary for Contact {
    fn summary(&self) -> String {
        format!("{:>6}  {:<28} {:<32} {}", self.id, self.full_name(), self.email, self.city)
    }
}

impl Summary for Organization {
    fn summary(&self) -> String {
        format!("{:>6}  {:<32} {:<20} {}", self.id, self.name, self.city, self.phone)
    }
}

impl Summary for AdminUser {
    fn summary(&self) -> String {
        let role = if self.owner { "owner" } else { "admin" };
        format!(
            "{:>6}  {:<28} {:<32} {}",
            self.id,
            format!("{} {}", self.first_name, self.last_name),
            self.email,
            role
        )
    }
}

pub async fn run<T>(
    console: &AdminConsole,
    controller: ResourceListController<T>,
    action: ResourceAction,
) -> Result<()>
where
    T: Resource + Summary,
{
    enter_screen(console, T::KIND).await?;

    let outcome = match action {
        ResourceAction::List { filter } => list(&controller, filter.as_deref()).await,
        ResourceAction::Show { id } => show(&controller, &ResourceId::new(id)).await,
        ResourceAction::Delete { id, .. } => delete(&controller, &ResourceId::new(id)).await,
    };
    controller.dispose();
    outcome
}

async fn list<T: Resource + Summary>(
    controller: &ResourceListController<T>,
    filter: Option<&str>,
) -> Result<()> {
    match controller.refresh().await {
        FetchResolution::Ready { .. } => {}
        FetchResolution::Failed(error) => bail!("Could not load {}s: {error}", T::KIND),
        FetchResolution::Unauthorized => bail!("The backend rejected the session"),
        FetchResolution::Stale | FetchResolution::Disposed => return Ok(()),
    }

    if let Some(query) = filter {
        controller.apply_filter(query);
    }

    controller.with_view(|view| match view {
        ListView::Items(items) => {
            for item in items {
                println!("{}", item.summary());
            }
            println!("\n{} {}(s)", items.len(), T::KIND);
        }
        ListView::Empty => println!("No {}s found.", T::KIND),
        ListView::Idle | ListView::Loading => {}
        ListView::Error(error) => eprintln!("❌ {error}"),
    });
    Ok(())
}

async fn show<T: Resource + Summary>(
    controller: &ResourceListController<T>,
    id: &ResourceId,
) -> Result<()> {
    let record = controller.get(id).await?;
    println!("{}", record.summary());
    Ok(())
}

async fn delete<T: Resource>(controller: &ResourceListController<T>, id: &ResourceId) -> Result<()> {
    match controller.remove(id).await? {
        RemoveOutcome::Cancelled => println!("Cancelled."),
        RemoveOutcome::Removed { resync } => {
            if let FetchResolution::Ready { count } = resync {
                println!("{count} {}(s) remaining", T::KIND);
            }
        }
        RemoveOutcome::Disposed => {}
    }
    Ok(())
}
