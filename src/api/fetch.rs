//! Single-resource fetching.

use tracing::{debug, warn};

use super::decode::{decode, Resource};
use super::error::Result;
use super::transport::{Request, Transport};

/// Execute one request and return the raw body.
///
/// Status handling belongs to the transport; whatever body it hands back,
/// empty or not, is returned as is.
pub async fn fetch<T: Transport>(transport: &T, request: &Request) -> Result<Vec<u8>> {
    debug!(method = %request.method, url = %request.url, "Fetching");
    let body = transport.execute(request).await?;
    debug!(len = body.len(), "Fetched");
    Ok(body)
}

/// GET `url` and decode the body as `R`, asking for the format `R` is
/// served in.
pub async fn fetch_resource<T: Transport, R: Resource>(transport: &T, url: &str) -> Result<R> {
    let request = Request::get(url).accepting(R::KIND.format());
    let body = fetch(transport, &request).await?;
    decode(&body).map_err(|e| {
        warn!(url = %url, "Decode failed: {}", e);
        e
    })
}
