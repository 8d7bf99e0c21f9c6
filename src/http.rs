//! Shared HTTP plumbing for the provider adapters.
use reqwest::{Client, RequestBuilder, StatusCode};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ProviderError;

pub const USER_AGENT: &str = "trendwise/0.1";

/// Build the client shared by every adapter.
pub fn client() -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

/// Send a request and return the body of a successful response.
pub async fn send_text(provider: &'static str, request: RequestBuilder) -> Result<String, ProviderError> {
    let res = request.send().await?;
    let status = res.status();
    debug!(provider, %status, "provider responded");

    if status == StatusCode::TOO_MANY_REQUESTS {
        let body = res.text().await.unwrap_or_default();
        warn!(provider, "rate limited: {}", body);
        return Err(ProviderError::Status { status: status.as_u16(), body });
    }
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ProviderError::Status { status: status.as_u16(), body });
    }
    Ok(res.text().await?)
}

/// Bound `fut` by `limit`; expiry is reported like any other provider error.
pub async fn with_timeout<T, E, F>(limit: Duration, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: From<ProviderError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(ProviderError::Timeout(limit).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_maps_expiry_to_provider_error() {
        let res: Result<(), ProviderError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(res, Err(ProviderError::Timeout(d)) if d == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn with_timeout_passes_through_results() {
        let res: Result<u8, ProviderError> = with_timeout(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(res.unwrap(), 7);
    }
}
