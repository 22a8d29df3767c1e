//! Public site endpoint.
//!
//! Serves every path on every `<slug>.<domain>.<tld>` host that is not a
//! management route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Uri, header};
use axum::response::Html;
use percent_encoding::percent_decode_str;

use crate::error::ServerError;
use crate::presenter;
use crate::state::AppState;

/// Handle GET on any public site path.
pub(crate) async fn render_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, ServerError> {
    let host = request_host(&headers, &uri);
    let path = percent_decode_str(uri.path()).decode_utf8_lossy();

    let page = state.resolver.resolve(host, &path).await?;
    tracing::debug!(slug = %page.site.slug, source = %page.source_path, "Serving page");

    Ok(Html(presenter::public_site(&page.site, &page.html)))
}

/// Host from the `Host` header, or the URI authority for HTTP/2 requests.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> &'a str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(axum::http::uri::Authority::as_str))
        .unwrap_or_default()
}
