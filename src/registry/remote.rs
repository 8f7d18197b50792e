//! Remote registries served over HTTP.
//!
//! Items are fetched from `{base_url}/{name}.json`, or from a URL template
//! containing a `{name}` placeholder.

use tracing::debug;

use super::fetch::{HttpFetcher, HttpStatusError};
use super::item::RegistryItem;
use super::source::RegistrySource;
use crate::error::{KitboxError, Result};

/// Placeholder substituted with the item name in URL templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// A registry backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    name: String,
    url: String,
    headers: Vec<(String, String)>,
    fetcher: HttpFetcher,
}

impl HttpRegistry {
    /// Create a remote registry.
    ///
    /// `url` is either a base URL or a template containing `{name}`.
    pub fn new(name: impl Into<String>, url: impl Into<String>, fetcher: HttpFetcher) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            headers: Vec::new(),
            fetcher,
        }
    }

    /// Send these headers with every request.
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// URL of an item document.
    pub fn item_url(&self, item: &str) -> String {
        if self.url.contains(NAME_PLACEHOLDER) {
            self.url.replace(NAME_PLACEHOLDER, item)
        } else {
            format!("{}/{}.json", self.url.trim_end_matches('/'), item)
        }
    }
}

impl RegistrySource for HttpRegistry {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, item: &str) -> Result<Option<RegistryItem>> {
        let url = self.item_url(item);
        let reference = format!("{}/{}", self.name, item);
        debug!("Fetching {} from {}", reference, url);

        match fetch_document(&self.fetcher, &url, &self.headers, &reference)? {
            Some(content) => parse_item(&content, &reference).map(Some),
            None => Ok(None),
        }
    }
}

/// Fetch and validate an item from a fully-qualified URL.
///
/// Unlike a registry lookup, a 404 here is an [`KitboxError::ItemNotFound`].
pub fn fetch_item_url(
    fetcher: &HttpFetcher,
    url: &str,
    headers: &[(String, String)],
) -> Result<RegistryItem> {
    debug!("Fetching {}", url);
    let content =
        fetch_document(fetcher, url, headers, url)?.ok_or_else(|| KitboxError::ItemNotFound {
            reference: url.to_string(),
        })?;
    parse_item(&content, url)
}

fn fetch_document(
    fetcher: &HttpFetcher,
    url: &str,
    headers: &[(String, String)],
    reference: &str,
) -> Result<Option<String>> {
    match fetcher.fetch(url, headers) {
        Ok(response) => Ok(Some(response.content)),
        Err(e) => match e.downcast_ref::<HttpStatusError>() {
            Some(status) if status.is_not_found() => Ok(None),
            _ => Err(KitboxError::RegistryUnreachable {
                reference: reference.to_string(),
                message: format!("{:#}", e),
            }),
        },
    }
}

fn parse_item(content: &str, reference: &str) -> Result<RegistryItem> {
    RegistryItem::from_json(content).map_err(|message| KitboxError::SchemaValidation {
        reference: reference.to_string(),
        message,
    })
}
