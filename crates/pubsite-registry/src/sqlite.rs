//! `SQLite`-backed site registry.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::registry::{RegistryError, SiteLookup, SiteRegistry};
use crate::site::{NewSite, Site};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS sites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id INTEGER NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    github_repo TEXT NOT NULL,
    github_branch TEXT NOT NULL,
    subdirectory TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL
)";

const CREATE_OWNER_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_sites_owner_id ON sites (owner_id)";

const SITE_COLUMNS: &str = "id, owner_id, slug, github_repo, github_branch, subdirectory, created_at";

/// Site registry stored in a `SQLite` database.
///
/// The slug column carries a `UNIQUE` constraint, so concurrent creates
/// for the same slug cannot both succeed.
#[derive(Clone, Debug)]
pub struct SqliteRegistry {
    pool: SqlitePool,
}

impl SqliteRegistry {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    ///
    /// In-memory databases are pinned to a single long-lived connection;
    /// every new connection to `:memory:` would otherwise see an empty
    /// database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RegistryError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and ensure the schema.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, RegistryError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_OWNER_INDEX).execute(&pool).await?;
        tracing::debug!("Site registry schema ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl SiteRegistry for SqliteRegistry {
    async fn find_by_slug(&self, slug: &str) -> SiteLookup {
        let sql = format!("SELECT {SITE_COLUMNS} FROM sites WHERE slug = ?");
        sqlx::query_as::<_, Site>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from)
            .into()
    }

    async fn find_by_id(&self, id: i64) -> SiteLookup {
        let sql = format!("SELECT {SITE_COLUMNS} FROM sites WHERE id = ?");
        sqlx::query_as::<_, Site>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RegistryError::from)
            .into()
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Site>, RegistryError> {
        let sql = format!(
            "SELECT {SITE_COLUMNS} FROM sites WHERE owner_id = ? ORDER BY created_at DESC, id DESC"
        );
        let sites = sqlx::query_as::<_, Site>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(sites)
    }

    async fn create(&self, site: NewSite) -> Result<Site, RegistryError> {
        let sql = format!(
            "INSERT INTO sites (owner_id, slug, github_repo, github_branch, subdirectory, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {SITE_COLUMNS}"
        );
        let result = sqlx::query_as::<_, Site>(&sql)
            .bind(site.owner_id)
            .bind(&site.slug)
            .bind(&site.github_repo)
            .bind(&site.github_branch)
            .bind(&site.subdirectory)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(created) => {
                tracing::info!(id = created.id, slug = %created.slug, "Site created");
                Ok(created)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RegistryError::SlugTaken(site.slug))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RegistryError> {
        let result = sqlx::query("DELETE FROM sites WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(id, removed = result.rows_affected(), "Site deleted");
        Ok(())
    }
}
