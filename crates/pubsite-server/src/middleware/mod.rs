//! HTTP middleware.

pub(crate) mod headers;
