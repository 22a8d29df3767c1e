//! `pubsite sites` command implementations.

use clap::{Args, Subcommand};
use pubsite_registry::{NewSite, SiteLookup, SiteRegistry, SqliteRegistry};

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Site registry subcommands.
#[derive(Subcommand)]
pub(crate) enum SitesCommand {
    /// List an owner's sites as JSON, newest first.
    List(ListArgs),
    /// Register a new site.
    Create(CreateArgs),
    /// Remove a site by id.
    Delete(DeleteArgs),
}

#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Owner user id.
    #[arg(long)]
    owner: i64,
}

#[derive(Args)]
pub(crate) struct CreateArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Owner user id.
    #[arg(long)]
    owner: i64,

    /// Subdomain label the site is served under.
    #[arg(long)]
    slug: String,

    /// GitHub repository as `owner/name`.
    #[arg(long)]
    repo: String,

    /// Branch to publish from.
    #[arg(long, default_value = "main")]
    branch: String,

    /// Directory inside the repository that holds the site.
    #[arg(long, default_value = "")]
    subdirectory: String,
}

#[derive(Args)]
pub(crate) struct DeleteArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Site id.
    id: i64,
}

impl SitesCommand {
    /// Execute the sites subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be opened or the operation fails.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let config_args = match &self {
            Self::List(args) => &args.config,
            Self::Create(args) => &args.config,
            Self::Delete(args) => &args.config,
        };
        let config = config_args.load(None, None)?;
        let registry =
            SqliteRegistry::connect(&config.database.url, config.database.max_connections)
                .await?;
        let output = Output::new();

        match self {
            Self::List(args) => list(&registry, args.owner, &output).await,
            Self::Create(args) => create(&registry, args.into_new_site(), &output).await,
            Self::Delete(args) => delete(&registry, args.id, &output).await,
        }
    }
}

impl CreateArgs {
    fn into_new_site(self) -> NewSite {
        NewSite {
            owner_id: self.owner,
            slug: self.slug,
            github_repo: self.repo,
            github_branch: self.branch,
            subdirectory: self.subdirectory,
        }
    }
}

async fn list(registry: &dyn SiteRegistry, owner: i64, output: &Output) -> Result<(), CliError> {
    let sites = registry.list_by_owner(owner).await?;
    if sites.is_empty() {
        output.detail(&format!("No sites for owner {owner}"));
    }
    output.data(&serde_json::to_string_pretty(&sites)?)?;
    Ok(())
}

async fn create(registry: &dyn SiteRegistry, site: NewSite, output: &Output) -> Result<(), CliError> {
    site.validate().map_err(CliError::Validation)?;
    let created = registry.create(site).await?;
    output.success(&format!(
        "Created site {} ({}) from {}@{}",
        created.slug, created.id, created.github_repo, created.github_branch
    ));
    Ok(())
}

async fn delete(registry: &dyn SiteRegistry, id: i64, output: &Output) -> Result<(), CliError> {
    let site = match registry.find_by_id(id).await {
        SiteLookup::Found(site) => site,
        SiteLookup::NotFound => return Err(CliError::SiteNotFound(id)),
        SiteLookup::Failure(e) => return Err(e.into()),
    };
    registry.delete(id).await?;
    output.success(&format!("Deleted site {} ({id})", site.slug));
    Ok(())
}
