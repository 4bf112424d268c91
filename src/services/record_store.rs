//! Record Store client for Phonebook.
//!
//! Wraps the five operations the application performs against the remote
//! collection (list, insert, bulk upsert, update, delete). The production
//! implementation speaks the PostgREST dialect over HTTPS via `reqwest`.
//! Nothing is cached here; every call is a network round trip.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::types::directory::PhoneEntry;
use crate::types::errors::StoreError;
use crate::types::settings::StoreSettings;

const PREFER: &str = "prefer";
const API_KEY: &str = "apikey";
const ACCEPT_PROFILE: &str = "accept-profile";
const CONTENT_PROFILE: &str = "content-profile";

/// Remote operations against the single phonebook collection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All rows ordered by `created_at` ascending. An empty collection is `Ok(vec![])`.
    async fn list(&self) -> Result<Vec<PhoneEntry>, StoreError>;
    /// Inserts one row and returns its stored representation.
    async fn insert(&self, entry: &PhoneEntry) -> Result<PhoneEntry, StoreError>;
    /// Inserts or overwrites rows by `id` in a single request.
    async fn bulk_upsert(&self, entries: &[PhoneEntry]) -> Result<Vec<PhoneEntry>, StoreError>;
    /// Overwrites `building`, `department` and `number` of the row with `entry.id`.
    async fn update(&self, entry: &PhoneEntry) -> Result<PhoneEntry, StoreError>;
    /// Removes the row with `id`. A missing row is not reported.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Payload for seeding: server assigns `created_at`.
#[derive(Serialize)]
struct SeedRow<'a> {
    id: &'a str,
    building: &'a str,
    department: &'a str,
    number: &'a str,
}

impl<'a> From<&'a PhoneEntry> for SeedRow<'a> {
    fn from(entry: &'a PhoneEntry) -> Self {
        Self {
            id: &entry.id,
            building: &entry.building,
            department: &entry.department,
            number: &entry.number,
        }
    }
}

#[derive(Serialize)]
struct EntryChanges<'a> {
    building: &'a str,
    department: &'a str,
    number: &'a str,
}

/// PostgREST-backed record store.
#[derive(Clone)]
pub struct RestRecordStore {
    client: Client,
    endpoint: String,
    api_key: String,
    schema: String,
}

impl RestRecordStore {
    /// Builds a client for `<base_url>/rest/v1/<table>`.
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let base = settings.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(StoreError::Config("store.base_url is not set".to_string()));
        }
        if settings.table.is_empty() {
            return Err(StoreError::Config("store.table is not set".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rest/v1/{}", base, settings.table),
            api_key: settings.api_key.clone(),
            schema: settings.schema.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn headers(&self, method: &Method) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.api_key.is_empty() {
            headers.insert(HeaderName::from_static(API_KEY), header_value(&self.api_key)?);
            headers.insert(
                AUTHORIZATION,
                header_value(&format!("Bearer {}", self.api_key))?,
            );
        }

        if !self.schema.is_empty() {
            let profile = if *method == Method::GET || *method == Method::HEAD {
                ACCEPT_PROFILE
            } else {
                CONTENT_PROFILE
            };
            headers.insert(HeaderName::from_static(profile), header_value(&self.schema)?);
        }

        Ok(headers)
    }

    fn request(&self, method: Method) -> Result<RequestBuilder, StoreError> {
        let headers = self.headers(&method)?;
        Ok(self.client.request(method, &self.endpoint).headers(headers))
    }

    pub fn list_request(&self) -> Result<Request, StoreError> {
        Ok(self
            .request(Method::GET)?
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .build()?)
    }

    pub fn insert_request(&self, entry: &PhoneEntry) -> Result<Request, StoreError> {
        Ok(self
            .request(Method::POST)?
            .header(PREFER, "return=representation")
            .json(&[entry])
            .build()?)
    }

    pub fn bulk_upsert_request(&self, entries: &[PhoneEntry]) -> Result<Request, StoreError> {
        let rows: Vec<SeedRow<'_>> = entries.iter().map(SeedRow::from).collect();
        Ok(self
            .request(Method::POST)?
            .header(PREFER, "resolution=merge-duplicates,return=representation")
            .json(&rows)
            .build()?)
    }

    pub fn update_request(&self, entry: &PhoneEntry) -> Result<Request, StoreError> {
        let changes = EntryChanges {
            building: &entry.building,
            department: &entry.department,
            number: &entry.number,
        };
        Ok(self
            .request(Method::PATCH)?
            .query(&[("id", format!("eq.{}", entry.id))])
            .header(PREFER, "return=representation")
            .json(&changes)
            .build()?)
    }

    pub fn delete_request(&self, id: &str) -> Result<Request, StoreError> {
        Ok(self
            .request(Method::DELETE)?
            .query(&[("id", format!("eq.{}", id))])
            .header(PREFER, "return=minimal")
            .build()?)
    }

    /// Sends `request` and fails on any non-2xx status, keeping the body for diagnostics.
    async fn send(&self, request: Request) -> Result<reqwest::Response, StoreError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "store request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(%method, status = status.as_u16(), "store response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, StoreError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

fn header_value(value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value).map_err(|e| StoreError::Config(format!("invalid header value: {}", e)))
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn list(&self) -> Result<Vec<PhoneEntry>, StoreError> {
        let request = self.list_request()?;
        self.send_json(request).await
    }

    async fn insert(&self, entry: &PhoneEntry) -> Result<PhoneEntry, StoreError> {
        let request = self.insert_request(entry)?;
        let rows: Vec<PhoneEntry> = self.send_json(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".to_string()))
    }

    async fn bulk_upsert(&self, entries: &[PhoneEntry]) -> Result<Vec<PhoneEntry>, StoreError> {
        let request = self.bulk_upsert_request(entries)?;
        self.send_json(request).await
    }

    async fn update(&self, entry: &PhoneEntry) -> Result<PhoneEntry, StoreError> {
        let request = self.update_request(entry)?;
        let rows: Vec<PhoneEntry> = self.send_json(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(entry.id.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let request = self.delete_request(id)?;
        self.send(request).await?;
        Ok(())
    }
}

/// Stands in for the remote store while its settings are incomplete.
///
/// Every call fails with [`StoreError::Config`], so the controller keeps the
/// bundled directory and surfaces the usual create and seed notices.
#[derive(Debug, Clone)]
pub struct UnconfiguredStore {
    reason: String,
}

impl UnconfiguredStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Config(self.reason.clone())
    }
}

#[async_trait]
impl RecordStore for UnconfiguredStore {
    async fn list(&self) -> Result<Vec<PhoneEntry>, StoreError> {
        Err(self.error())
    }

    async fn insert(&self, _entry: &PhoneEntry) -> Result<PhoneEntry, StoreError> {
        Err(self.error())
    }

    async fn bulk_upsert(&self, _entries: &[PhoneEntry]) -> Result<Vec<PhoneEntry>, StoreError> {
        Err(self.error())
    }

    async fn update(&self, _entry: &PhoneEntry) -> Result<PhoneEntry, StoreError> {
        Err(self.error())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(self.error())
    }
}
