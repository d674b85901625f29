use anyhow::Context as _;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::SignupError;
use crate::infra::http::{ensure_success, read_json};

/// Filter on a PostgREST request, e.g. `("email", "eq.a@x.com")`.
pub type Filter<'a> = (&'a str, String);

pub fn eq(column: &str, value: impl std::fmt::Display) -> Filter<'_> {
    (column, format!("eq.{value}"))
}

pub fn is_null(column: &str) -> Filter<'_> {
    (column, "is.null".to_owned())
}

/// HTTP client for one Supabase project, authenticated with the service-role key.
///
/// Tables are reached through PostgREST under `/rest/v1`; accounts through the GoTrue admin
/// API under `/auth/v1/admin`.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(http: Client, base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            service_key: service_key.into(),
        }
    }

    pub fn table_url(&self, table: &str, filters: &[Filter<'_>]) -> Result<Url, SignupError> {
        let mut url = Url::parse(&format!("{}/rest/v1/{table}", self.base_url))
            .context("build data store url")?;
        if !filters.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(filters.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub fn admin_url(&self, path: &str) -> Result<Url, SignupError> {
        Ok(Url::parse(&format!("{}/auth/v1/admin/{path}", self.base_url))
            .context("build identity url")?)
    }

    /// Attach the service-role credentials to a request.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `GET` rows matching `filters`.
    pub async fn select<T>(
        &self,
        table: &str,
        filters: &[Filter<'_>],
        context: &'static str,
    ) -> Result<Vec<T>, SignupError>
    where
        T: DeserializeOwned,
    {
        let url = self.table_url(table, filters)?;
        let resp = self.authorize(self.http.get(url)).send().await.context(context)?;
        read_json(resp, context).await
    }

    /// `POST` one row and return the stored representation.
    pub async fn insert<B, T>(
        &self,
        table: &str,
        row: &B,
        context: &'static str,
    ) -> Result<T, SignupError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table, &[])?;
        let resp = self
            .authorize(self.http.post(url))
            .header("prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .context(context)?;
        let rows: Vec<T> = read_json(resp, context).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{context}: empty representation").into())
    }

    /// `PATCH` rows matching `filters` and return the updated rows. An empty result means
    /// no row matched.
    pub async fn update<B, T>(
        &self,
        table: &str,
        filters: &[Filter<'_>],
        patch: &B,
        context: &'static str,
    ) -> Result<Vec<T>, SignupError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table, filters)?;
        let resp = self
            .authorize(self.http.patch(url))
            .header("prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .context(context)?;
        read_json(resp, context).await
    }

    /// `DELETE` rows matching `filters`.
    pub async fn delete(
        &self,
        table: &str,
        filters: &[Filter<'_>],
        context: &'static str,
    ) -> Result<(), SignupError> {
        let url = self.table_url(table, filters)?;
        let resp = self
            .authorize(self.http.delete(url))
            .send()
            .await
            .context(context)?;
        ensure_success(resp, context).await?;
        Ok(())
    }
}
