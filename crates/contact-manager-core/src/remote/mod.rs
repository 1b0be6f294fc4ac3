//! Remote store abstraction.
//!
//! The [`RemoteStore`] trait is the contract the sync protocol consumes:
//! list, create, update, and delete against the source of truth. Write
//! responses are ignored by the protocol; only success or failure
//! matters, because every successful write is followed by a full list.
//!
//! | Operation | HTTP shape |
//! |-----------|------------|
//! | [`list`](RemoteStore::list) | `GET` collection → JSON array of contacts |
//! | [`create`](RemoteStore::create) | `POST` collection with a [`ContactPayload`] |
//! | [`update`](RemoteStore::update) | `PUT` collection`/{id}` with a [`ContactPayload`] |
//! | [`delete`](RemoteStore::delete) | `DELETE` collection`/{id}` |
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Contact, ContactId, ContactPayload};

/// Source of truth for contact records.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the full contact list.
    async fn list(&self) -> Result<Vec<Contact>>;

    /// Create a contact. The remote store assigns the id.
    async fn create(&self, payload: &ContactPayload) -> Result<()>;

    /// Replace the fields of an existing contact.
    async fn update(&self, id: &ContactId, payload: &ContactPayload) -> Result<()>;

    /// Delete a contact.
    async fn delete(&self, id: &ContactId) -> Result<()>;
}
