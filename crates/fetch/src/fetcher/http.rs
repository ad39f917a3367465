//! Blocking HTTP fetcher.

use std::time::Duration;

use cube_extract::Document;
use cube_extract::models::CardId;
use exn::ResultExt;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::instrument;

use super::DocumentFetcher;
use crate::error::{ErrorKind, Result};

/// Placeholder replaced by the card identifier in an address template.
pub const ID_PLACEHOLDER: &str = "{id}";
pub const DEFAULT_URL_TEMPLATE: &str = "https://gatherer.wizards.com/Pages/Card/Details.aspx?multiverseid={id}";
const DEFAULT_USER_AGENT: &str = concat!("cube/", env!("CARGO_PKG_VERSION"));

/// Fetches details pages over HTTP(S), one GET per call.
///
/// No timeout is applied unless one is configured.
pub struct HttpFetcher {
    name: String,
    client: Client,
    url_template: String,
}

impl HttpFetcher {
    /// Build a fetcher for `url_template`, which must contain
    /// [`ID_PLACEHOLDER`].
    pub fn new(url_template: impl Into<String>, timeout: Option<Duration>, user_agent: Option<&str>) -> Result<Self> {
        let url_template = url_template.into();
        if !url_template.contains(ID_PLACEHOLDER) {
            exn::bail!(ErrorKind::InvalidAddress(format!("template {url_template:?} has no {ID_PLACEHOLDER}")));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .or_raise(|| ErrorKind::Network("cannot build HTTP client".to_string()))?;
        let name = url_template
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or("http")
            .to_string();
        Ok(Self { name, client, url_template })
    }

    /// The address requested for `id`.
    pub fn url_for(&self, id: CardId) -> String {
        self.url_template.replace(ID_PLACEHOLDER, &id.to_string())
    }
}

impl DocumentFetcher for HttpFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(source = %self.name))]
    fn fetch(&self, id: CardId) -> Result<Document> {
        let url = self.url_for(id);
        tracing::debug!(%url, "Requesting card page");
        let response = self
            .client
            .get(&url)
            .send()
            .or_raise(|| ErrorKind::Network(format!("request to {url} failed")))?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            exn::bail!(ErrorKind::NotFound(id));
        }
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response
            .text()
            .or_raise(|| ErrorKind::Network(format!("reading body from {url} failed")))?;
        tracing::trace!(size = body.len(), "Received card page");
        Ok(Document::parse(&body))
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("name", &self.name)
            .field("url_template", &self.url_template)
            .finish_non_exhaustive()
    }
}
