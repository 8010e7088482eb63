//! PostgREST implementation of [`EmployeeStore`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::models::{Employee, EmployeePatch, NewEmployee};
use crate::query::Query;
use crate::store::EmployeeStore;

pub const DEFAULT_TABLE: &str = "employees";

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestStore {
    /// Never fails: a blank endpoint or key turns every call into
    /// `StoreError::NotConfigured` instead of aborting startup.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: build_client(Duration::from_secs(15)),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn table_url(&self) -> Result<String> {
        if self.base_url.is_empty() {
            return Err(StoreError::NotConfigured("store endpoint URL is not set".into()));
        }
        if self.api_key.is_empty() {
            return Err(StoreError::NotConfigured("store API key is not set".into()));
        }
        Ok(format!("{}/rest/v1/{}", self.base_url, self.table))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn read_rows(response: Response) -> Result<Vec<Employee>> {
        let response = check_status(response).await?;
        let rows = response.json::<Vec<Employee>>().await?;
        Ok(rows)
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        body,
    })
}

/// Total from a `Content-Range` value such as `0-9/42` or `*/42`.
fn parse_content_range_total(value: &str) -> Result<u64> {
    let total = value
        .rsplit('/')
        .next()
        .ok_or_else(|| StoreError::InvalidResponse(format!("bad Content-Range: {value}")))?;
    total
        .trim()
        .parse::<u64>()
        .map_err(|_| StoreError::InvalidResponse(format!("no exact count in Content-Range: {value}")))
}

#[async_trait]
impl EmployeeStore for RestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Employee>> {
        let url = self.table_url()?;
        let params = query.to_params();
        debug!(table = %self.table, ?params, "select");

        let response = self
            .authorize(self.client.get(&url))
            .query(&params)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    async fn count(&self, query: &Query) -> Result<u64> {
        let url = self.table_url()?;
        let mut params = vec![("select".to_string(), "id".to_string())];
        params.extend(query.filter_params());
        debug!(table = %self.table, ?params, "count");

        let response = self
            .authorize(self.client.head(&url))
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check_status(response).await?;

        let range = response
            .headers()
            .get("content-range")
            .ok_or_else(|| StoreError::InvalidResponse("missing Content-Range header".into()))?
            .to_str()
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))?;
        parse_content_range_total(range)
    }

    async fn insert(&self, record: &NewEmployee) -> Result<Vec<Employee>> {
        let url = self.table_url()?;
        debug!(table = %self.table, email = %record.email, "insert");

        let response = self
            .authorize(self.client.post(&url))
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(&[record])
            .send()
            .await?;
        Self::read_rows(response).await
    }

    async fn update(&self, id: i64, patch: &EmployeePatch) -> Result<Vec<Employee>> {
        let url = self.table_url()?;
        debug!(table = %self.table, id, "update");

        let response = self
            .authorize(self.client.patch(&url))
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_string())])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Self::read_rows(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, LoginStatus};
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn row_json(id: i64, code: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "emp_code": code,
            "name": "Ravi",
            "email": "ravi@example.com",
            "department": "Ops",
            "role": null,
            "login_status": "logged_out",
            "created_at": "2025-03-04T10:00:00+00:00",
            "deleted_at": null
        })
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range_total("*/42").unwrap(), 42);
        assert_eq!(parse_content_range_total("0-9/120").unwrap(), 120);
        assert!(parse_content_range_total("0-9/*").is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_store_fails_without_request() {
        let store = RestStore::new("", "");
        assert!(!store.is_configured());
        let err = store.select(&Query::all()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_select_sends_postgrest_params_and_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/employees"))
            .and(query_param("select", "*"))
            .and(query_param("deleted_at", "is.null"))
            .and(query_param("order", "emp_code.asc"))
            .and(header("apikey", "anon-key"))
            .and(header("Authorization", "Bearer anon-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([row_json(1, "EMP0001"), row_json(2, "EMP0002")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = RestStore::new(server.uri(), "anon-key");
        let rows = store
            .select(&Query::all().is_null(Column::DeletedAt).order_asc(Column::EmpCode))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].code(), "EMP0002");
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/rest/v1/employees"))
            .and(query_param("created_at", "gte.2025-03-04T00:00:00.000Z"))
            .and(header("Prefer", "count=exact"))
            .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "*/17"))
            .mount(&server)
            .await;

        let store = RestStore::new(server.uri(), "anon-key");
        let start = Utc.with_ymd_and_hms(2025, 3, 4, 0, 0, 0).unwrap();
        let total = store
            .count(&Query::all().gte(Column::CreatedAt, start))
            .await
            .unwrap();
        assert_eq!(total, 17);
    }

    #[tokio::test]
    async fn test_insert_posts_array_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/employees"))
            .and(header("Prefer", "return=representation"))
            .and(body_json(serde_json::json!([{
                "name": "Ravi",
                "email": "ravi@example.com",
                "department": "Ops",
                "role": null,
                "login_status": "logged_out"
            }])))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([row_json(5, "EMP0005")])))
            .mount(&server)
            .await;

        let store = RestStore::new(format!("{}/", server.uri()), "anon-key");
        let created = store
            .insert(&NewEmployee {
                name: "Ravi".into(),
                email: "ravi@example.com".into(),
                department: Some("Ops".into()),
                role: None,
                login_status: LoginStatus::LoggedOut,
            })
            .await
            .unwrap();
        assert_eq!(created[0].id, 5);
    }

    #[tokio::test]
    async fn test_update_error_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/employees"))
            .and(query_param("id", "eq.3"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let store = RestStore::new(server.uri(), "wrong");
        let patch = EmployeePatch {
            login_status: Some(LoginStatus::LoggedIn),
            ..Default::default()
        };
        match store.update(3, &patch).await {
            Err(StoreError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }
}
