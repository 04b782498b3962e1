//! Authenticated transport and the generic resource shape shared by the
//! Radarr, Sonarr and Overseerr clients.
//!
//! # Design
//! - Base URLs carry the service's API prefix (`/api/v3`, `/api/v1`), so
//!   endpoints are built by appending path segments rather than joining.
//! - A `RestResource<T>` only knows its path, how it paginates, and which
//!   statuses count as success for deletes and updates; service clients are
//!   thin wrappers that configure one resource per collection.

use std::marker::PhantomData;
use std::time::Duration;

use arrsweep_config::ResolvedService;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Header carrying the API key on every request.
pub const HEADER_API_KEY: &str = "x-api-key";
/// Page size used for offset-paginated collections.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// HTTP transport bound to one service instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    /// Build a client with its own connection pool and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Setup`] when the base URL cannot carry path
    /// segments or the HTTP client cannot be constructed.
    pub fn new(base_url: Url, api_key: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::setup(format!("failed to build HTTP client: {err}")))?;
        Self::with_http(http, base_url, api_key)
    }

    /// Build a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_resolved(resolved: &ResolvedService, timeout: Duration) -> ClientResult<Self> {
        Self::new(resolved.url.clone(), resolved.api_key.clone(), timeout)
    }

    /// Wrap an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Setup`] when the base URL cannot carry path
    /// segments.
    pub fn with_http(http: Client, base_url: Url, api_key: impl Into<String>) -> ClientResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::setup(format!(
                "base URL '{base_url}' cannot carry path segments"
            )));
        }
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Append `segments` to the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Setup`] when the base URL cannot carry path
    /// segments.
    pub fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::setup(format!(
                    "base URL '{}' cannot carry path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(HEADER_API_KEY, &self.api_key)
            .header(ACCEPT, "application/json")
    }

    /// `GET` a JSON document, expecting `200 OK`.
    pub(crate) async fn get_json<T: DeserializeOwned + Send>(
        &self,
        url: Url,
        operation: &str,
    ) -> ClientResult<T> {
        let builder = self.request(Method::GET, url);
        let response = send_expecting(operation, builder, &[StatusCode::OK]).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ClientError::transport(operation, err))?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::decode(operation, err))
    }
}

/// Send a request and accept only the listed statuses.
pub(crate) async fn send_expecting(
    operation: &str,
    builder: RequestBuilder,
    expected: &[StatusCode],
) -> ClientResult<Response> {
    tracing::debug!(operation, "sending request");
    let response = builder
        .send()
        .await
        .map_err(|err| ClientError::transport(operation, err))?;
    let status = response.status();
    if expected.contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(operation, %status, "unexpected response status");
    Err(ClientError::status(operation, status, &body))
}

/// How a collection endpoint returns its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// One response holds the whole collection as a JSON array.
    Unpaged,
    /// `take`/`skip` paging with a `{ pageInfo, results }` envelope.
    Offset {
        /// Records requested per page.
        page_size: u32,
    },
}

/// Paging metadata returned alongside offset-paginated results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total number of pages, as reported by the server.
    #[serde(default)]
    pub pages: u64,
    /// Page size the server applied.
    #[serde(default)]
    pub page_size: u64,
    /// Total number of records across all pages.
    #[serde(default)]
    pub results: u64,
    /// One-based index of this page.
    #[serde(default)]
    pub page: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    page_info: PageInfo,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// A REST collection addressed as `<base>/<path>` and `<base>/<path>/<id>`.
#[derive(Debug, Clone)]
pub struct RestResource<T> {
    api: ApiClient,
    path: &'static str,
    pagination: Pagination,
    list_query: Vec<(&'static str, String)>,
    delete_query: Vec<(&'static str, String)>,
    delete_statuses: &'static [StatusCode],
    update_statuses: &'static [StatusCode],
    _record: PhantomData<fn() -> T>,
}

impl<T> RestResource<T>
where
    T: DeserializeOwned + Send,
{
    /// Unpaged resource accepting `200`/`204` for deletes and `200`/`202`
    /// for updates.
    #[must_use]
    pub fn new(api: ApiClient, path: &'static str) -> Self {
        Self {
            api,
            path,
            pagination: Pagination::Unpaged,
            list_query: Vec::new(),
            delete_query: Vec::new(),
            delete_statuses: &[StatusCode::OK, StatusCode::NO_CONTENT],
            update_statuses: &[StatusCode::OK, StatusCode::ACCEPTED],
            _record: PhantomData,
        }
    }

    /// Switch to offset pagination with `page_size` records per page.
    #[must_use]
    pub const fn paginated(mut self, page_size: u32) -> Self {
        self.pagination = Pagination::Offset { page_size };
        self
    }

    /// Add a query parameter sent with every list request.
    #[must_use]
    pub fn with_list_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.list_query.push((key, value.into()));
        self
    }

    /// Add a query parameter sent with every delete request.
    #[must_use]
    pub fn with_delete_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.delete_query.push((key, value.into()));
        self
    }

    /// Statuses that count as a successful delete.
    #[must_use]
    pub const fn expect_delete(mut self, statuses: &'static [StatusCode]) -> Self {
        self.delete_statuses = statuses;
        self
    }

    /// Statuses that count as a successful update.
    #[must_use]
    pub const fn expect_update(mut self, statuses: &'static [StatusCode]) -> Self {
        self.update_statuses = statuses;
        self
    }

    /// Fetch every record, following pagination until the reported total is
    /// reached.
    ///
    /// # Errors
    ///
    /// Returns the first transport, status or decoding failure.
    pub async fn list_all(&self) -> ClientResult<Vec<T>> {
        self.list_where(&[]).await
    }

    /// Like [`RestResource::list_all`] with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns the first transport, status or decoding failure.
    pub async fn list_where(&self, query: &[(&str, String)]) -> ClientResult<Vec<T>> {
        let mut url = self.api.endpoint(&[self.path])?;
        if !self.list_query.is_empty() || !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.list_query {
                pairs.append_pair(key, value);
            }
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        let operation = format!("GET {}", url.path());

        match self.pagination {
            Pagination::Unpaged => self.api.get_json::<Vec<T>>(url, &operation).await,
            Pagination::Offset { page_size } => {
                self.list_pages(&url, &operation, u64::from(page_size)).await
            }
        }
    }

    async fn list_pages(&self, url: &Url, operation: &str, page_size: u64) -> ClientResult<Vec<T>> {
        let mut records = Vec::new();
        let mut skip: u64 = 0;
        loop {
            let mut page_url = url.clone();
            page_url
                .query_pairs_mut()
                .append_pair("take", &page_size.to_string())
                .append_pair("skip", &skip.to_string());

            let page = self.api.get_json::<Page<T>>(page_url, operation).await?;
            let fetched = page.results.len();
            records.extend(page.results);
            skip += page_size;

            tracing::debug!(
                operation,
                fetched,
                total = page.page_info.results,
                skip,
                "fetched page"
            );
            if fetched == 0 || skip >= page.page_info.results {
                break;
            }
        }
        Ok(records)
    }

    /// Delete the record with `id`.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or [`ClientError::Status`] when the
    /// response status is not one of the accepted delete statuses.
    pub async fn delete_by_id(&self, id: i64) -> ClientResult<()> {
        let mut url = self.api.endpoint(&[self.path, &id.to_string()])?;
        if !self.delete_query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.delete_query {
                pairs.append_pair(key, value);
            }
        }
        let operation = format!("DELETE {}", url.path());
        let builder = self.api.request(Method::DELETE, url);
        send_expecting(&operation, builder, self.delete_statuses).await?;
        Ok(())
    }

    /// Replace the record with `id` by `record`.
    ///
    /// # Errors
    ///
    /// Returns a transport failure or [`ClientError::Status`] when the
    /// response status is not one of the accepted update statuses.
    pub async fn update_by_id(&self, id: i64, record: &T) -> ClientResult<()>
    where
        T: Serialize + Sync,
    {
        let url = self.api.endpoint(&[self.path, &id.to_string()])?;
        let operation = format!("PUT {}", url.path());
        let builder = self.api.request(Method::PUT, url).json(record);
        send_expecting(&operation, builder, self.update_statuses).await?;
        Ok(())
    }
}
