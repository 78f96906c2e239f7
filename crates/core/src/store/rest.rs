//! REST query client
//!
//! Thin [`DemoBackend`] implementation over a PostgREST-style endpoint:
//! row filters are query parameters (`id=eq.<uuid>`), inserts return the
//! created row when asked with `Prefer: return=representation`, and no
//! joins or transactions are issued server-side.

use reqwest::{Method, RequestBuilder};
use uuid::Uuid;

use async_trait::async_trait;

use super::backend::{
    CommentChanges, CommentRow, DemoBackend, DemoChanges, DemoRow, NewCommentRow, NewDemoRow,
};
use crate::error::Error;
use crate::Result;

/// Configuration for the REST backend
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL of the REST endpoint, without a trailing slash
    pub base_url: String,
    /// API key, sent both as `apikey` header and bearer token
    pub api_key: String,
}

/// Query client for the remote relational backend
pub struct RestBackend {
    config: RestConfig,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.config.base_url, path);
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    /// Insert a row and return the representation the backend echoes back
    async fn insert_returning<Row, Payload>(&self, table: &str, payload: &Payload) -> Result<Row>
    where
        Row: serde::de::DeserializeOwned,
        Payload: serde::Serialize + Sync,
    {
        let mut rows: Vec<Row> = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if rows.is_empty() {
            return Err(Error::Backend(format!(
                "insert into {} returned no representation",
                table
            )));
        }
        Ok(rows.remove(0))
    }
}

#[async_trait]
impl DemoBackend for RestBackend {
    async fn fetch_demos(&self) -> Result<Vec<DemoRow>> {
        let rows = self
            .request(Method::GET, "demos?select=*&order=created_at.desc")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn fetch_comments(&self) -> Result<Vec<CommentRow>> {
        let rows = self
            .request(Method::GET, "comments?select=*&order=created_at.asc")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(rows)
    }

    async fn insert_demo(&self, row: NewDemoRow) -> Result<DemoRow> {
        self.insert_returning("demos", &row).await
    }

    async fn update_demo(&self, id: Uuid, changes: DemoChanges) -> Result<()> {
        self.request(Method::PATCH, &format!("demos?id=eq.{}", id))
            .json(&changes)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_demo(&self, id: Uuid) -> Result<()> {
        // Delete the comment rows first; the schema is not assumed to
        // cascade on the demo foreign key.
        self.request(Method::DELETE, &format!("comments?demo_id=eq.{}", id))
            .send()
            .await?
            .error_for_status()?;
        self.request(Method::DELETE, &format!("demos?id=eq.{}", id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn insert_comment(&self, row: NewCommentRow) -> Result<CommentRow> {
        self.insert_returning("comments", &row).await
    }

    async fn insert_comments(&self, rows: Vec<NewCommentRow>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        self.request(Method::POST, "comments")
            .json(&rows)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update_comment(&self, id: Uuid, changes: CommentChanges) -> Result<()> {
        self.request(Method::PATCH, &format!("comments?id=eq.{}", id))
            .json(&changes)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        self.request(Method::DELETE, &format!("comments?id=eq.{}", id))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
