//! Release resolution for tools published through a directory listing
//! instead of a versioned URL.
//!
//! The listing is an Azure blob container enumeration:
//!
//! ```xml
//! <EnumerationResults ContainerName="...">
//!   <Blobs>
//!     <Blob>
//!       <Name>Python-Language-Server-linux-x64.0.5.31.nupkg</Name>
//!       <Url>https://.../Python-Language-Server-linux-x64.0.5.31.nupkg</Url>
//!       <Properties><Last-Modified>Tue, 17 Dec 2019 17:41:17 GMT</Last-Modified></Properties>
//!     </Blob>
//!   </Blobs>
//! </EnumerationResults>
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::installer::base::http_client;
use crate::installer::context::InstallContext;
use crate::installer::error::InstallError;
use crate::installer::platform::Os;

#[derive(Debug, Deserialize)]
struct EnumerationResults {
    #[serde(rename = "Blobs", default)]
    blobs: Blobs,
}

#[derive(Debug, Default, Deserialize)]
struct Blobs {
    #[serde(rename = "Blob", default)]
    blob: Vec<Blob>,
}

#[derive(Debug, Deserialize)]
struct Blob {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Url")]
    url: String,
    #[serde(rename = "Properties")]
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    #[serde(rename = "Last-Modified")]
    last_modified: String,
}

/// One downloadable artifact in a release listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
    pub last_modified: DateTime<Utc>,
}

/// Substring that identifies artifacts built for an operating system.
pub fn platform_token(os: Os) -> &'static str {
    match os {
        Os::Windows => "win",
        Os::Darwin => "osx",
        Os::Linux => "linux",
        _ => "any",
    }
}

/// Parses a listing document into entries.
pub fn parse_listing(xml: &str) -> Result<Vec<CatalogEntry>, InstallError> {
    let results: EnumerationResults =
        quick_xml::de::from_str(xml).map_err(|e| InstallError::Catalog(e.to_string()))?;

    results
        .blobs
        .blob
        .into_iter()
        .map(|blob| {
            let last_modified = DateTime::parse_from_rfc2822(&blob.properties.last_modified)
                .map_err(|e| {
                    InstallError::Catalog(format!(
                        "invalid Last-Modified {:?} for {}: {}",
                        blob.properties.last_modified, blob.url, e
                    ))
                })?
                .with_timezone(&Utc);
            Ok(CatalogEntry {
                name: blob.name,
                url: blob.url,
                last_modified,
            })
        })
        .collect()
}

impl CatalogEntry {
    /// Artifact file name: the blob name, or the last URL path segment when
    /// the listing omits it.
    pub fn file_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        let path = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        path.rsplit('/').next().unwrap_or(path)
    }
}

/// Keeps entries whose file name contains `token` and returns the most
/// recently modified one. The host is ignored (`*.windows.net` contains "win").
pub fn select_latest(
    entries: Vec<CatalogEntry>,
    token: &str,
) -> Result<CatalogEntry, InstallError> {
    let mut matching: Vec<CatalogEntry> = entries
        .into_iter()
        .filter(|entry| entry.file_name().contains(token))
        .collect();
    matching.sort_by_key(|entry| entry.last_modified);
    matching
        .pop()
        .ok_or_else(|| InstallError::Catalog(format!("no release matches platform {token:?}")))
}

/// Fetches a listing endpoint and resolves it to a single artifact.
pub struct ReleaseCatalog {
    client: reqwest::Client,
    url: String,
}

impl ReleaseCatalog {
    pub fn new(url: &str) -> Self {
        Self {
            client: http_client(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self, ctx: &InstallContext) -> Result<Vec<CatalogEntry>, InstallError> {
        debug!("Fetching release listing {}", self.url);

        let network = |source| InstallError::Network {
            url: self.url.clone(),
            source,
        };

        let response = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(InstallError::Cancelled),
            response = self.client.get(&self.url).send() => response.map_err(network)?,
        };

        let status = response.status();
        let body = tokio::select! {
            biased;
            () = ctx.cancelled() => return Err(InstallError::Cancelled),
            body = response.text() => body.map_err(network)?,
        };

        if !status.is_success() {
            return Err(InstallError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body,
            });
        }

        parse_listing(&body)
    }

    pub async fn resolve(
        &self,
        ctx: &InstallContext,
        token: &str,
    ) -> Result<CatalogEntry, InstallError> {
        let entries = self.fetch(ctx).await?;
        let latest = select_latest(entries, token)?;
        info!("Resolved release {} ({})", latest.url, latest.last_modified);
        Ok(latest)
    }
}
