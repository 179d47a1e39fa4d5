//! ARM Client
//!
//! Prepares GET requests against the versioned management surface, hands
//! them to the transport and decodes the paged responses.

use super::http::{ArmHttpClient, RawResponse, Transport};
use super::paging::{Page, PageBody};
use crate::error::{Error, PrepareError, ResponseError, Result, TransportError};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

pub const DEFAULT_BASE_URI: &str = "https://management.azure.com";

/// Immutable client configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    base_uri: String,
    api_version: String,
}

impl ClientOptions {
    pub fn new(base_uri: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            api_version: api_version.into(),
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

/// Client for one ARM API version
#[derive(Clone)]
pub struct ArmClient {
    options: ClientOptions,
    transport: Arc<dyn Transport>,
}

impl ArmClient {
    /// Create a client using the default reqwest transport
    pub fn new(options: ClientOptions) -> std::result::Result<Self, TransportError> {
        let transport = ArmHttpClient::new()?;
        Ok(Self::with_transport(options, Arc::new(transport)))
    }

    /// Create a client sending through the given transport
    pub fn with_transport(options: ClientOptions, transport: Arc<dyn Transport>) -> Self {
        Self { options, transport }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Build a request URL from a path and query pairs, always adding the
    /// client's `api-version`
    pub fn url(&self, path: &str, query: &[(String, String)]) -> std::result::Result<Url, PrepareError> {
        let mut url = self.join_path(path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api-version", &self.options.api_version);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Build the request URL for a continuation cursor. The cursor's path and
    /// query are reused as-is against the configured base URI.
    pub fn next_link_url(&self, next_link: &str) -> std::result::Result<Url, PrepareError> {
        let base = Url::parse(&self.options.base_uri).map_err(|source| PrepareError::Url {
            base: self.options.base_uri.clone(),
            path: String::new(),
            source,
        })?;
        let cursor = Url::options()
            .base_url(Some(&base))
            .parse(next_link)
            .map_err(|source| PrepareError::NextLink {
                link: next_link.to_string(),
                source,
            })?;

        let mut url = self.join_path(cursor.path())?;
        if cursor.query().is_some() {
            url.query_pairs_mut().extend_pairs(cursor.query_pairs());
        }
        Ok(url)
    }

    fn join_path(&self, path: &str) -> std::result::Result<Url, PrepareError> {
        let base = self.options.base_uri.trim_end_matches('/');
        let joined = if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        };

        Url::parse(&joined).map_err(|source| PrepareError::Url {
            base: self.options.base_uri.clone(),
            path: path.to_string(),
            source,
        })
    }

    /// Fetch the first page of a listing
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Page<T>> {
        let url = self
            .url(path, query)
            .map_err(|source| Error::Prepare { operation, source })?;
        self.fetch(operation, url).await
    }

    /// Fetch the page a continuation cursor points at
    pub async fn get_next_page<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        next_link: &str,
    ) -> Result<Page<T>> {
        let url = self
            .next_link_url(next_link)
            .map_err(|source| Error::Prepare { operation, source })?;
        self.fetch(operation, url).await
    }

    /// Fetch the page following `page`, reporting failures under the
    /// listing that produced it. Fails with [`Error::NoMorePages`] without
    /// sending anything when `page` is the last one.
    pub async fn load_more<T: DeserializeOwned>(&self, page: &Page<T>) -> Result<Page<T>> {
        match page.next_link() {
            Some(link) => self.get_next_page(page.operation(), link).await,
            None => Err(Error::NoMorePages),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, operation: &'static str, url: Url) -> Result<Page<T>> {
        let mut request = Request::new(Method::GET, url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|source| Error::Send { operation, source })?;

        decode_page(operation, response).map_err(|source| Error::Respond { operation, source })
    }
}

/// Decode a `{ value, nextLink }` listing body; anything but 200 is an error
pub(crate) fn decode_page<T: DeserializeOwned>(
    operation: &'static str,
    response: RawResponse,
) -> std::result::Result<Page<T>, ResponseError> {
    if response.status != StatusCode::OK {
        return Err(ResponseError::Status {
            status: response.status.as_u16(),
            body: super::http::sanitize_for_log(&response.body),
        });
    }

    let body: PageBody<T> = serde_json::from_str(&response.body).map_err(ResponseError::Decode)?;
    Ok(body.into_page(operation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArmClient {
        ArmClient::new(ClientOptions::new("https://management.example.com/", "2020-10-15-preview"))
            .unwrap()
    }

    #[test]
    fn test_url_always_carries_api_version() {
        let url = client().url("/subscriptions/abc/providers/X", &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://management.example.com/subscriptions/abc/providers/X?api-version=2020-10-15-preview"
        );
    }

    #[test]
    fn test_url_encodes_query_values() {
        let query = vec![("$filter".to_string(), "name eq 'a b'".to_string())];
        let url = client().url("/x", &query).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[1], ("$filter".to_string(), "name eq 'a b'".to_string()));
    }

    #[test]
    fn test_next_link_reuses_path_and_query() {
        let url = client()
            .next_link_url("https://other.host/subscriptions/abc/providers/X?api-version=v1&$skipToken=tok%3D")
            .unwrap();
        assert_eq!(url.host_str(), Some("management.example.com"));
        assert_eq!(url.path(), "/subscriptions/abc/providers/X");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("api-version".to_string(), "v1".to_string()),
                ("$skipToken".to_string(), "tok=".to_string()),
            ]
        );
    }

    #[test]
    fn test_next_link_accepts_relative_cursor() {
        let url = client().next_link_url("/page/2?skip=2").unwrap();
        assert_eq!(url.as_str(), "https://management.example.com/page/2?skip=2");
    }

    #[test]
    fn test_malformed_next_link_names_cursor() {
        let err = client().next_link_url("https://[broken/page").unwrap_err();
        match &err {
            PrepareError::NextLink { link, .. } => assert_eq!(link, "https://[broken/page"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("https://[broken/page"));
    }

    #[test]
    fn test_decode_rejects_non_200() {
        let response = RawResponse {
            status: StatusCode::ACCEPTED,
            body: "{}".to_string(),
        };
        let err = decode_page::<serde_json::Value>("Things.List", response).unwrap_err();
        assert!(matches!(err, ResponseError::Status { status: 202, .. }));
    }

    #[test]
    fn test_decode_null_value_is_empty_page() {
        let response = RawResponse {
            status: StatusCode::OK,
            body: r#"{"value": null, "nextLink": null}"#.to_string(),
        };
        let page = decode_page::<serde_json::Value>("Things.List", response).unwrap();
        assert!(page.items().is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_decode_malformed_json() {
        let response = RawResponse {
            status: StatusCode::OK,
            body: "{\"value\": [".to_string(),
        };
        assert!(matches!(
            decode_page::<serde_json::Value>("Things.List", response),
            Err(ResponseError::Decode(_))
        ));
    }
}
