//! In-memory [`RemoteStore`] implementation for tests, WASM demos, and
//! the reference API server.
//!
//! Uses a `Vec` behind `std::sync::Mutex`. Ids are sequential numbers
//! starting at 1 and are never reused.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::models::{Contact, ContactId, ContactPayload};

use super::RemoteStore;

struct Inner {
    contacts: Vec<Contact>,
    next_id: u64,
}

/// In-memory contact collection.
pub struct MemoryRemote {
    inner: Mutex<Inner>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::with_contacts(Vec::new())
    }

    /// Seed the collection. Contacts without an id are assigned one.
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        let mut next_id = contacts
            .iter()
            .filter_map(|c| match c.id {
                Some(ContactId::Number(n)) => Some(n + 1),
                _ => None,
            })
            .max()
            .unwrap_or(1);
        let contacts = contacts
            .into_iter()
            .map(|mut c| {
                if c.id.is_none() {
                    c.id = Some(ContactId::Number(next_id));
                    next_id += 1;
                }
                c
            })
            .collect();
        Self {
            inner: Mutex::new(Inner { contacts, next_id }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Vec<Contact> {
        self.lock().contacts.clone()
    }

    pub fn get(&self, id: &ContactId) -> Option<Contact> {
        self.lock()
            .contacts
            .iter()
            .find(|c| c.id.as_ref() == Some(id))
            .cloned()
    }

    /// Store a new contact and return it with its assigned id.
    pub fn insert(&self, payload: ContactPayload) -> Contact {
        let mut inner = self.lock();
        let id = ContactId::Number(inner.next_id);
        inner.next_id += 1;
        let contact = payload.into_contact(id);
        inner.contacts.push(contact.clone());
        contact
    }

    /// Overwrite an existing contact's fields, keeping its position.
    pub fn replace(&self, id: &ContactId, payload: ContactPayload) -> Option<Contact> {
        let mut inner = self.lock();
        let slot = inner
            .contacts
            .iter_mut()
            .find(|c| c.id.as_ref() == Some(id))?;
        *slot = payload.into_contact(id.clone());
        Some(slot.clone())
    }

    /// Remove a contact. Returns `false` if no contact has that id.
    pub fn remove(&self, id: &ContactId) -> bool {
        let mut inner = self.lock();
        let before = inner.contacts.len();
        inner.contacts.retain(|c| c.id.as_ref() != Some(id));
        inner.contacts.len() != before
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn list(&self) -> Result<Vec<Contact>> {
        Ok(self.snapshot())
    }

    async fn create(&self, payload: &ContactPayload) -> Result<()> {
        self.insert(payload.clone());
        Ok(())
    }

    async fn update(&self, id: &ContactId, payload: &ContactPayload) -> Result<()> {
        if self.replace(id, payload.clone()).is_none() {
            bail!("contact {} not found", id);
        }
        Ok(())
    }

    async fn delete(&self, id: &ContactId) -> Result<()> {
        if !self.remove(id) {
            bail!("contact {} not found", id);
        }
        Ok(())
    }
}
