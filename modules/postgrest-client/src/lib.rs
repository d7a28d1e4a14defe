pub mod error;

pub use error::{PostgrestError, Result};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A single PostgREST horizontal filter, e.g. `id=eq.4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    column: String,
    expr: String,
}

impl Filter {
    pub fn eq(column: &str, value: impl std::fmt::Display) -> Self {
        Self {
            column: column.to_string(),
            expr: format!("eq.{value}"),
        }
    }

    pub fn neq(column: &str, value: impl std::fmt::Display) -> Self {
        Self {
            column: column.to_string(),
            expr: format!("neq.{value}"),
        }
    }

    /// Matches every row with a non-null `column`. Used for deliberate
    /// whole-table writes, which Supabase refuses without a filter.
    pub fn not_null(column: &str) -> Self {
        Self {
            column: column.to_string(),
            expr: "not.is.null".to_string(),
        }
    }

    fn as_pair(&self) -> (&str, &str) {
        (&self.column, &self.expr)
    }
}

/// REST client for a Supabase project (`{url}/rest/v1`), authenticated with
/// a service-role key.
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(project_url: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            api_key,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(table: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PostgrestError::Api {
                table: table.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp)
    }

    /// `select=*` over a table or view.
    pub async fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let resp = self
            .request(reqwest::Method::GET, table)
            .query(&[("select", "*")])
            .send()
            .await?;
        let resp = Self::check(table, resp).await?;

        let rows: Vec<T> = serde_json::from_slice(&resp.bytes().await?)?;
        tracing::debug!(table, rows = rows.len(), "Fetched rows");
        Ok(rows)
    }

    /// PATCH every row matching `filters` with the columns in `patch`.
    pub async fn update<P: Serialize + ?Sized>(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &P,
    ) -> Result<()> {
        let query: Vec<(&str, &str)> = filters.iter().map(Filter::as_pair).collect();
        let resp = self
            .request(reqwest::Method::PATCH, table)
            .query(&query)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        Self::check(table, resp).await?;
        tracing::debug!(table, filters = ?filters, "Updated rows");
        Ok(())
    }

    /// DELETE every row matching `filters`.
    pub async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let query: Vec<(&str, &str)> = filters.iter().map(Filter::as_pair).collect();
        let resp = self
            .request(reqwest::Method::DELETE, table)
            .query(&query)
            .header("Prefer", "return=minimal")
            .send()
            .await?;
        Self::check(table, resp).await?;
        tracing::debug!(table, filters = ?filters, "Deleted rows");
        Ok(())
    }
}
