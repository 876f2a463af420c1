use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A validated scraping request, built once per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapingRequest {
    pub url: String,
    pub requirement: String,
    pub html_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("url is empty")]
    EmptyUrl,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("requirement is empty")]
    EmptyRequirement,
}

impl ScrapingRequest {
    pub fn new(
        url: &str,
        requirement: &str,
        html_context: Option<&str>,
    ) -> Result<Self, RequestError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(RequestError::EmptyUrl);
        }
        let parsed = Url::parse(url).map_err(|err| RequestError::InvalidUrl(err.to_string()))?;
        if parsed.host_str().is_none() {
            return Err(RequestError::InvalidUrl("url has no host".to_string()));
        }

        let requirement = requirement.trim();
        if requirement.is_empty() {
            return Err(RequestError::EmptyRequirement);
        }

        let html_context = html_context
            .map(str::trim)
            .filter(|html| !html.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            url: url.to_string(),
            requirement: requirement.to_string(),
            html_context,
        })
    }

    pub fn hostname(&self) -> String {
        hostname_of(&self.url)
    }
}

/// Host part of `url`, or the raw input when it does not parse.
pub(crate) fn hostname_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| url.to_string())
}

/// Source code, markdown explanation and dependency list returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub code: String,
    pub explanation: String,
    pub libraries: Vec<String>,
}
