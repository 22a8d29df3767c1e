//! HTTP request handlers.

pub(crate) mod public_site;
pub(crate) mod sites;
