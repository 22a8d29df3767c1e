//! Public-site resolution for pubsite.
//!
//! Turns an inbound `(host, path)` pair into a rendered page:
//!
//! 1. [`parse_host`] takes the slug from the first host label
//! 2. the site registry maps the slug to a repository
//! 3. [`normalize_path`] maps the request path to a markdown file
//! 4. the content fetcher retrieves it, trying [`index_fallback`] once
//!    when a `README.md` is missing
//! 5. the markdown renderer produces the HTML fragment
//!
//! Page layout is left to the caller.

mod error;
mod host;
mod path;
mod resolver;

pub use error::ResolveError;
pub use host::parse_host;
pub use path::{INDEX, README, index_fallback, normalize_path};
pub use resolver::{RenderedPage, SiteResolver};
