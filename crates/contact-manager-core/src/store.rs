//! The authoritative in-memory contact list.
//!
//! The list is replaced wholesale on every fetch; entries are never
//! patched in place. Alongside it the store tracks which contact the
//! create/edit form is targeting.

use tracing::debug;

use crate::models::{Contact, ContactId};

/// Owns the current contact snapshot and the form's edit target.
#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
    target: Option<ContactId>,
    editing: bool,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, in the order the remote store returned it.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Replace the whole snapshot with a freshly fetched list.
    pub fn replace(&mut self, contacts: Vec<Contact>) {
        debug!(
            previous = self.contacts.len(),
            current = contacts.len(),
            "replaced contact snapshot"
        );
        self.contacts = contacts;
    }

    /// Find the id of the first contact whose phone number and email both
    /// equal the given values exactly.
    ///
    /// This reverse-maps displayed text to identity and is lossy: two
    /// contacts sharing phone and email are indistinguishable, and the
    /// first one in the list wins. Prefer carrying the id itself.
    pub fn resolve_id(&self, phone_number: &str, email: &str) -> Option<ContactId> {
        self.contacts
            .iter()
            .find(|c| c.phone_number == phone_number && c.email == email)
            .and_then(|c| c.id.clone())
    }

    pub fn lookup(&self, id: &ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id.as_ref() == Some(id))
    }

    /// Contacts with at least one non-empty text field whose lowercased
    /// value contains `pattern`, in snapshot order.
    ///
    /// `pattern` is used as given; callers lowercase it first. An empty
    /// pattern matches every contact with a non-empty field.
    pub fn search(&self, pattern: &str) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|contact| {
                contact
                    .text_fields()
                    .iter()
                    .any(|field| !field.is_empty() && field.to_lowercase().contains(pattern))
            })
            .cloned()
            .collect()
    }

    /// Id of the contact the form targets for edit or delete.
    pub fn target(&self) -> Option<&ContactId> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, id: Option<ContactId>) {
        self.target = id;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }
}
