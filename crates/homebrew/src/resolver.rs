//! Release resolution: latest release, macOS asset, checksum.

use crate::error::{Error, Result};
use ghbr_github::{GitHub, Release, ReleaseAsset, RepoRef};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// The release a formula should point at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseInfo {
    /// Release tag (e.g. "v0.0.2")
    pub version: String,
    /// Download URL of the selected asset
    pub asset_url: String,
    /// Lowercase hex SHA-256 of the asset body
    pub checksum_hex: String,
}

/// Picks the release asset a formula installs.
///
/// An asset matches when its name contains both markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMatcher {
    /// Operating system marker (e.g. "darwin")
    pub platform: String,
    /// CPU architecture marker (e.g. "amd64")
    pub arch: String,
}

impl Default for AssetMatcher {
    fn default() -> Self {
        Self::new("darwin", "amd64")
    }
}

impl AssetMatcher {
    /// Creates a matcher for the given markers.
    #[must_use]
    pub fn new(platform: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            arch: arch.into(),
        }
    }

    /// Returns `true` if `name` carries both markers.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name.contains(&self.platform) && name.contains(&self.arch)
    }

    /// The first matching asset, in the order the release lists them.
    #[must_use]
    pub fn select<'r>(&self, assets: &'r [ReleaseAsset]) -> Option<&'r ReleaseAsset> {
        assets.iter().find(|asset| self.matches(&asset.name))
    }

    fn no_match(&self) -> Error {
        Error::handled(format!(
            "No released asset whose name contains \"{p}\" and \"{a}\".\n\
             You need to name one of the assets with \"{p}\" and \"{a}\" to specify the asset is for Mac.",
            p = self.platform,
            a = self.arch,
        ))
    }
}

/// Resolves the latest release of a repository into a [`ReleaseInfo`].
pub struct ReleaseResolver<'a> {
    github: &'a dyn GitHub,
    http: Client,
    matcher: AssetMatcher,
}

impl<'a> ReleaseResolver<'a> {
    /// Creates a resolver with its own HTTP client for asset downloads.
    pub fn new(github: &'a dyn GitHub) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("ghbr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::client(e.to_string()))?;

        Ok(Self::with_http_client(github, http))
    }

    /// Creates a resolver that downloads assets with `http`.
    #[must_use]
    pub fn with_http_client(github: &'a dyn GitHub, http: Client) -> Self {
        Self {
            github,
            http,
            matcher: AssetMatcher::default(),
        }
    }

    /// Replaces the asset matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: AssetMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Fetches the latest release of `source`, selects its asset and hashes it.
    pub async fn resolve(&self, source: &RepoRef) -> Result<ReleaseInfo> {
        info!(repo = %source, "Fetching the latest release");
        let release = self.github.latest_release(source).await?;

        let asset = self.select_asset(&release)?;
        info!(
            version = %release.tag_name,
            asset = %asset.name,
            "Calculating a checksum of the release asset"
        );
        let checksum_hex = self.checksum(&asset.browser_download_url).await?;

        Ok(ReleaseInfo {
            version: release.tag_name.clone(),
            asset_url: asset.browser_download_url.clone(),
            checksum_hex,
        })
    }

    fn select_asset<'r>(&self, release: &'r Release) -> Result<&'r ReleaseAsset> {
        self.matcher
            .select(&release.assets)
            .ok_or_else(|| self.matcher.no_match())
    }

    /// Downloads `url` and returns the lowercase hex SHA-256 of its body.
    pub async fn checksum(&self, url: &str) -> Result<String> {
        debug!(%url, "Downloading release asset");

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::download(url, format!("unexpected HTTP status {status}")));
        }

        let mut hasher = Sha256::new();
        let mut size = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?
        {
            size += chunk.len();
            hasher.update(&chunk);
        }

        let checksum = hex::encode(hasher.finalize());
        debug!(%url, size, %checksum, "Hashed release asset");
        Ok(checksum)
    }
}
