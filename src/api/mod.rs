use std::time::Duration;

use log::warn;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub mod models;

use self::models::{AssetsManifest, ManifestVersion, VersionsManifest};

pub const VERSIONS_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest_v2.json";

/// Why a manifest load failed. Network and decode problems surface the
/// same way in the UI, as the placeholder text of the affected list.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("missing JSON field \"{0}\"")]
    MissingField(&'static str),
}

/// Build the HTTP client shared by both manifest loads.
#[must_use]
pub fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|err| {
            warn!("api: falling back to default HTTP client configuration ({err})");
            Client::new()
        })
}

/// Fetch and decode the versions manifest. One GET, no retry, no caching.
///
/// # Errors
/// Returns the first [`FetchError`] hit by the request or the decode.
pub async fn fetch_versions_manifest(client: &Client) -> Result<VersionsManifest, FetchError> {
    let body = get_text(client, VERSIONS_MANIFEST_URL).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Fetch the assets manifest of `version`: GET the version detail document,
/// pull `assetIndex.url` out of it, then GET and decode the index itself.
/// The chained pair fails as a unit with the first error encountered.
///
/// # Errors
/// Returns the first [`FetchError`] from either request or either decode.
pub async fn fetch_assets_manifest(
    client: &Client,
    version: &ManifestVersion,
) -> Result<AssetsManifest, FetchError> {
    let body = get_text(client, &version.url).await?;
    let detail: Value = serde_json::from_str(&body)?;
    let index_url = asset_index_url(&detail)?;
    let body = get_text(client, index_url).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// The version detail document is loosely typed; only `assetIndex.url`
/// is consumed.
fn asset_index_url(version_detail: &Value) -> Result<&str, FetchError> {
    version_detail
        .pointer("/assetIndex/url")
        .and_then(Value::as_str)
        .ok_or(FetchError::MissingField("assetIndex.url"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_asset_index_url() {
        let detail = json!({
            "assetIndex": {
                "id": "17",
                "sha1": "fab1bd24ad59730bf35eaaa2e6605153e344cb0f",
                "url": "https://piston-meta.mojang.com/v1/packages/fa/17.json"
            },
            "downloads": {}
        });
        assert_eq!(
            asset_index_url(&detail).unwrap(),
            "https://piston-meta.mojang.com/v1/packages/fa/17.json"
        );
    }

    #[test]
    fn missing_asset_index_is_an_error() {
        let detail = json!({ "downloads": {} });
        let err = asset_index_url(&detail).unwrap_err();
        assert!(matches!(err, FetchError::MissingField("assetIndex.url")));
        assert_eq!(err.to_string(), "missing JSON field \"assetIndex.url\"");
    }

    #[test]
    fn mistyped_asset_index_url_is_an_error() {
        let detail = json!({ "assetIndex": { "url": 7 } });
        assert!(matches!(
            asset_index_url(&detail),
            Err(FetchError::MissingField("assetIndex.url"))
        ));
    }

    #[test]
    fn decode_failures_map_to_fetch_error() {
        let err = serde_json::from_str::<Value>("not json").unwrap_err();
        let fetch: FetchError = err.into();
        assert!(matches!(fetch, FetchError::Decode(_)));
        assert!(fetch.to_string().starts_with("invalid JSON:"));
    }
}
