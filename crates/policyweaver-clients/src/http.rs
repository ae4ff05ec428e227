use policyweaver_core::api::ClientError;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Transport(e.to_string()))
}

pub(crate) fn parse_base(base: &str) -> Result<Url, ClientError> {
    Url::parse(base).map_err(|e| ClientError::Transport(format!("invalid url '{}': {}", base, e)))
}

/// `base` with `segments` appended, each percent-encoded as one segment
pub(crate) fn join_segments(base: &str, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = parse_base(base)?;
    url.path_segments_mut()
        .map_err(|_| ClientError::Transport(format!("'{}' cannot be a base url", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ClientError> {
    let resp = check(req).await?;
    resp.json::<T>()
        .await
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

pub(crate) async fn send_empty(req: RequestBuilder) -> Result<(), ClientError> {
    check(req).await.map(|_| ())
}

async fn check(req: RequestBuilder) -> Result<reqwest::Response, ClientError> {
    let resp = req
        .send()
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(url));
    }
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
