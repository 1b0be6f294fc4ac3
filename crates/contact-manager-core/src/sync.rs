//! Refetch-after-write sync protocol.
//!
//! [`ContactManager`] is the single entry point for the event-routing
//! layer. Every successful mutation is followed, unconditionally, by:
//!
//! 1. a full refetch of the contact list into the [`ContactStore`],
//! 2. a full rebuild of the [`TagIndex`] from that snapshot,
//! 3. a redraw of the tag list, the contact list, and a blank form.
//!
//! The client never patches local state from a write response. A failed
//! write stops the cycle: no refetch runs, local state is untouched, and
//! the user gets a failure notice rather than a success one.
//!
//! Read-only filtering (search, tag selection) works on the current
//! snapshot and never touches the remote store.
//!
//! Operations take `&mut self`, so one manager runs at most one cycle at
//! a time; concurrent front ends each need their own manager.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::ContactError;
use crate::models::{Contact, ContactForm, ContactId, ContactPayload};
use crate::remote::RemoteStore;
use crate::store::ContactStore;
use crate::tags::{normalize, TagIndex};
use crate::view::{Notice, Notifier, View};

/// The active contact-list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    None,
    /// Free-text search, already lowercased.
    Search(String),
    /// A selected tag.
    Tag(String),
}

/// Wires the contact store and tag index to a remote store, a view, and
/// a notifier.
pub struct ContactManager {
    remote: Arc<dyn RemoteStore>,
    view: Arc<dyn View>,
    notifier: Arc<dyn Notifier>,
    contacts: ContactStore,
    tags: TagIndex,
    filter: Filter,
}

impl ContactManager {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        view: Arc<dyn View>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            remote,
            view,
            notifier,
            contacts: ContactStore::new(),
            tags: TagIndex::new(),
            filter: Filter::None,
        }
    }

    pub fn contacts(&self) -> &ContactStore {
        &self.contacts
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    // ── Sync cycle ──────────────────────────────────────────────────

    /// Pull the full list, rebuild tags, and redraw everything.
    ///
    /// On failure the previous snapshot and tags are kept.
    pub async fn refresh(&mut self) -> Result<(), ContactError> {
        debug!("fetching contact list");
        let contacts = self
            .remote
            .list()
            .await
            .map_err(|e| ContactError::transport("load the contact list", e))?;

        self.contacts.replace(contacts);
        self.tags.rebuild(self.contacts.contacts());
        self.filter = Filter::None;

        self.view.render_tags(self.tags.tags(), None);
        self.view.render_contacts(self.contacts.contacts());
        self.view.show_no_matches(false);
        self.view.render_form(&Contact::blank());
        Ok(())
    }

    /// Create a contact from form values.
    pub async fn create_contact(&mut self, form: &ContactForm) -> Result<(), ContactError> {
        let (operation, success) = self.write(None, form).await?;
        self.sync_after_write(operation, success).await
    }

    /// Replace the fields of contact `id` with form values.
    pub async fn update_contact(
        &mut self,
        id: &ContactId,
        form: &ContactForm,
    ) -> Result<(), ContactError> {
        let (operation, success) = self.write(Some(id), form).await?;
        self.sync_after_write(operation, success).await
    }

    /// Delete contact `id` without asking.
    pub async fn delete_contact(&mut self, id: &ContactId) -> Result<(), ContactError> {
        let operation = "delete the contact";
        let result = self.remote.delete(id).await;
        self.check_write(operation, result).await?;
        self.sync_after_write(operation, Notice::Deleted).await
    }

    /// Ask for confirmation, then delete contact `id`.
    ///
    /// Returns `Ok(false)` if the user declined.
    pub async fn request_delete(&mut self, id: &ContactId) -> Result<bool, ContactError> {
        self.contacts.set_target(Some(id.clone()));
        let confirmed = self
            .notifier
            .confirm_delete(id, self.contacts.lookup(id))
            .await;
        if !confirmed {
            debug!(%id, "delete declined");
            self.contacts.set_target(None);
            return Ok(false);
        }
        let result = self.delete_contact(id).await;
        self.contacts.set_target(None);
        result.map(|()| true)
    }

    async fn payload(&self, form: &ContactForm) -> Result<ContactPayload, ContactError> {
        match form.to_payload() {
            Ok(payload) => Ok(payload),
            Err(err) => {
                warn!(error = %err, "contact form rejected");
                if let ContactError::MissingField(field) = &err {
                    self.notifier.notify(Notice::MissingField(*field)).await;
                }
                Err(err)
            }
        }
    }

    /// Validate `form` and send it: an update of `target`, or a create.
    ///
    /// Returns the operation name and the notice to send once synced.
    async fn write(
        &self,
        target: Option<&ContactId>,
        form: &ContactForm,
    ) -> Result<(&'static str, Notice), ContactError> {
        let payload = self.payload(form).await?;
        let (operation, success, result) = match target {
            Some(id) => (
                "update the contact",
                Notice::Updated,
                self.remote.update(id, &payload).await,
            ),
            None => (
                "add the contact",
                Notice::Added,
                self.remote.create(&payload).await,
            ),
        };
        self.check_write(operation, result).await?;
        Ok((operation, success))
    }

    async fn check_write(
        &self,
        operation: &'static str,
        result: anyhow::Result<()>,
    ) -> Result<(), ContactError> {
        if let Err(source) = result {
            let message = format!("{:#}", source);
            warn!(operation, error = %message, "remote write failed, skipping refetch");
            self.notifier
                .notify(Notice::Failed { operation, message })
                .await;
            return Err(ContactError::transport(operation, source));
        }
        Ok(())
    }

    async fn sync_after_write(
        &mut self,
        operation: &'static str,
        success: Notice,
    ) -> Result<(), ContactError> {
        if let Err(err) = self.refresh().await {
            warn!(operation, error = %err, "refetch after write failed");
            if let ContactError::Transport {
                operation: failed,
                source,
            } = &err
            {
                self.notifier
                    .notify(Notice::Failed {
                        operation: *failed,
                        message: format!("{:#}", source),
                    })
                    .await;
            }
            return Err(err);
        }

        info!(operation, contacts = self.contacts.len(), "sync cycle complete");
        self.notifier.notify(success).await;
        Ok(())
    }

    // ── Form lifecycle ──────────────────────────────────────────────

    /// Show an empty form for a new contact.
    pub fn open_create_form(&mut self) {
        self.contacts.set_editing(false);
        self.contacts.set_target(None);
        self.view.render_form(&Contact::blank());
        self.view.show_form(true);
    }

    /// Select contact `id` for editing and show the pre-filled form.
    ///
    /// Returns `None`, changing nothing, if `id` is not in the snapshot.
    pub fn begin_edit(&mut self, id: &ContactId) -> Option<ContactForm> {
        let contact = self.contacts.lookup(id)?.clone();
        self.contacts.set_target(Some(id.clone()));
        self.contacts.set_editing(true);
        self.view.render_form(&contact);
        self.view.show_form(true);
        Some(ContactForm::from(&contact))
    }

    /// Submit the form: update the edit target, or create a new contact.
    ///
    /// The form closes once the server accepts the write, even if the
    /// refetch after it fails; a rejected or failed write leaves it open
    /// with the user's input.
    pub async fn submit_form(&mut self, form: &ContactForm) -> Result<(), ContactError> {
        let target = if self.contacts.is_editing() {
            let id = self
                .contacts
                .target()
                .cloned()
                .ok_or(ContactError::NotEditing)?;
            Some(id)
        } else {
            None
        };
        let (operation, success) = self.write(target.as_ref(), form).await?;
        let synced = self.sync_after_write(operation, success).await;
        self.close_form();
        synced
    }

    /// Abandon the form without writing anything.
    pub fn cancel_form(&mut self) {
        self.close_form();
    }

    fn close_form(&mut self) {
        self.view.show_form(false);
        self.contacts.set_editing(false);
        self.contacts.set_target(None);
        self.view.render_form(&Contact::blank());
    }

    // ── Filtering ───────────────────────────────────────────────────

    /// Filter the contact list by free text.
    ///
    /// The pattern is lowercased here; an empty pattern clears the filter.
    pub fn filter_by_search(&mut self, pattern: &str) -> Vec<Contact> {
        let pattern = pattern.to_lowercase();
        if pattern.is_empty() {
            return self.clear_filter();
        }
        let matches = self.contacts.search(&pattern);
        self.filter = Filter::Search(pattern);
        self.view.render_tags(self.tags.tags(), None);
        self.show_filtered(&matches);
        matches
    }

    /// Select `tag` as the filter, or deselect it if it already is.
    ///
    /// A selected tag matches contacts the same way a search does, across
    /// every text field.
    ///
    /// The tag is lowercased and normalized first, so `Work!` selects
    /// `work`; a tag that normalizes to nothing clears the filter.
    pub fn filter_by_tag(&mut self, tag: &str) -> Vec<Contact> {
        let tag = normalize(&tag.to_lowercase());
        if tag.is_empty() || self.filter == Filter::Tag(tag.clone()) {
            return self.clear_filter();
        }
        let matches = self.contacts.search(&tag);
        self.view.render_tags(self.tags.tags(), Some(&tag));
        self.filter = Filter::Tag(tag);
        self.show_filtered(&matches);
        matches
    }

    /// Drop any filter and show every contact.
    pub fn clear_filter(&mut self) -> Vec<Contact> {
        self.filter = Filter::None;
        self.view.render_tags(self.tags.tags(), None);
        self.view.render_contacts(self.contacts.contacts());
        self.view.show_no_matches(false);
        self.contacts.contacts().to_vec()
    }

    fn show_filtered(&self, matches: &[Contact]) {
        self.view.render_contacts(matches);
        self.view.show_no_matches(matches.is_empty());
    }

    fn selected_tag(&self) -> Option<&str> {
        match &self.filter {
            Filter::Tag(tag) => Some(tag.as_str()),
            _ => None,
        }
    }

    // ── Tags ────────────────────────────────────────────────────────

    /// Add a curated tag and redraw the tag list.
    pub async fn add_tag(&mut self, raw: &str) -> Result<String, ContactError> {
        match self.tags.add(raw) {
            Ok(tag) => {
                self.view.render_tags(self.tags.tags(), self.selected_tag());
                Ok(tag)
            }
            Err(err) => {
                self.notifier
                    .notify(Notice::InvalidTag(raw.to_string()))
                    .await;
                Err(err)
            }
        }
    }

    /// Remove a curated tag and redraw the tag list.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let removed = self.tags.remove(tag, self.contacts.contacts());
        if removed {
            self.view.render_tags(self.tags.tags(), self.selected_tag());
        }
        removed
    }

    // ── Identity ────────────────────────────────────────────────────

    /// See [`ContactStore::resolve_id`]; lossy when phone and email repeat.
    pub fn resolve_id(&self, phone_number: &str, email: &str) -> Option<ContactId> {
        self.contacts.resolve_id(phone_number, email)
    }

    pub fn lookup(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.lookup(id)
    }
}
