//! Site registry for pubsite.
//!
//! Maps subdomain slugs to the repository, branch and subdirectory a site
//! is published from. [`SqliteRegistry`] is the production backend;
//! [`MemoryRegistry`] (behind the `mock` feature) backs unit tests.
//!
//! # Example
//!
//! ```ignore
//! use pubsite_registry::{SiteLookup, SiteRegistry, SqliteRegistry};
//!
//! let registry = SqliteRegistry::connect("sqlite://pubsite.db", 5).await?;
//! match registry.find_by_slug("docs").await {
//!     SiteLookup::Found(site) => println!("{}", site.github_repo),
//!     SiteLookup::NotFound => println!("no such site"),
//!     SiteLookup::Failure(e) => return Err(e.into()),
//! }
//! ```

mod registry;
mod site;
mod sqlite;

#[cfg(any(test, feature = "mock"))]
mod memory;

pub use registry::{RegistryError, SiteLookup, SiteRegistry};
pub use site::{MAX_SLUG_LEN, NewSite, Site, ValidationErrors};
pub use sqlite::SqliteRegistry;

#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryRegistry;
