//! Best-effort sitemap submission to search engines.

use crate::error::PingError;
use reqwest::Client;
use tracing::{info, instrument, warn};

/// Notify each endpoint about `sitemap_url`, one request at a time.
///
/// The percent-encoded sitemap URL is appended to each endpoint, e.g.
/// `https://www.bing.com/ping?sitemap=` + `https%3A%2F%2F…`. Failures are
/// logged and returned; they never abort the run.
#[instrument(level = "info", skip(client, endpoints))]
pub async fn ping_search_engines(
    client: &Client,
    endpoints: &[String],
    sitemap_url: &str,
) -> Vec<Result<(), PingError>> {
    let mut results = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let result = ping(client, endpoint, sitemap_url).await;
        match &result {
            Ok(()) => info!(%endpoint, "Sitemap ping accepted"),
            Err(e) => warn!(%endpoint, error = %e, "Sitemap ping failed; ignoring"),
        }
        results.push(result);
    }
    results
}

async fn ping(client: &Client, endpoint: &str, sitemap_url: &str) -> Result<(), PingError> {
    let url = format!("{endpoint}{}", urlencoding::encode(sitemap_url));
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| PingError::Request {
            endpoint: endpoint.to_string(),
            source,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(PingError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(())
}
