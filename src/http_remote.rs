//! HTTP [`RemoteStore`] backed by `reqwest`.
//!
//! Talks to a JSON contacts API:
//!
//! | Method | URL | Body |
//! |--------|-----|------|
//! | `GET` | `{collection}` | none |
//! | `POST` | `{collection}` | [`ContactPayload`] |
//! | `PUT` | `{collection}/{id}` | [`ContactPayload`] |
//! | `DELETE` | `{collection}/{id}` | none |
//!
//! Any non-2xx status is an error carrying the status and response body.
//! Write responses are otherwise ignored.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use contact_manager_core::models::{Contact, ContactId, ContactPayload};
use contact_manager_core::remote::RemoteStore;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::config::RemoteConfig;

const JSON_UTF8: &str = "application/json; charset=UTF-8";

pub struct HttpRemote {
    client: Client,
    collection: Url,
}

impl HttpRemote {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let collection = Url::parse(&config.collection_url())
            .with_context(|| format!("Invalid contacts URL: {}", config.collection_url()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, collection })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// `{collection}/{id}`, with the id percent-encoded as one segment.
    fn item_url(&self, id: &ContactId) -> Result<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("contacts URL cannot be a base: {}", self.collection))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

/// Turn a non-success status into an error with the body text.
async fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    bail!("{} returned {}: {}", what, status, body.trim())
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn list(&self) -> Result<Vec<Contact>> {
        debug!(url = %self.collection, "GET contacts");
        let response = self.client.get(self.collection.clone()).send().await?;
        let response = check(response, "GET contacts").await?;
        response
            .json::<Vec<Contact>>()
            .await
            .context("Invalid contact list response")
    }

    async fn create(&self, payload: &ContactPayload) -> Result<()> {
        debug!(url = %self.collection, "POST contact");
        let response = self
            .client
            .post(self.collection.clone())
            .header(CONTENT_TYPE, JSON_UTF8)
            .json(payload)
            .send()
            .await?;
        check(response, "POST contact").await?;
        Ok(())
    }

    async fn update(&self, id: &ContactId, payload: &ContactPayload) -> Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "PUT contact");
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .json(payload)
            .send()
            .await?;
        check(response, "PUT contact").await?;
        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> Result<()> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE contact");
        let response = self.client.delete(url).send().await?;
        check(response, "DELETE contact").await?;
        Ok(())
    }
}
