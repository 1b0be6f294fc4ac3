//! Error taxonomy for contact operations.
//!
//! Validation failures and transport failures are errors; a lookup that
//! finds nothing is not (see [`ContactStore::lookup`](crate::store::ContactStore::lookup)).

use thiserror::Error;

/// Errors surfaced by [`ContactManager`](crate::sync::ContactManager)
/// operations.
#[derive(Debug, Error)]
pub enum ContactError {
    /// A tag submitted by the user contains no alphanumeric character.
    #[error("Sorry, that's not a valid tag: {0:?}")]
    InvalidTag(String),

    /// A required form field was left empty; the request was never sent.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The form was submitted in edit mode without a selected contact.
    #[error("no contact selected for editing")]
    NotEditing,

    /// The remote store call failed. Local state was left untouched.
    #[error("failed to {operation}: {source:#}")]
    Transport {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ContactError {
    pub(crate) fn transport(operation: &'static str, source: anyhow::Error) -> Self {
        ContactError::Transport { operation, source }
    }

    /// Whether this is a user-input rejection rather than a remote failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ContactError::InvalidTag(_) | ContactError::MissingField(_)
        )
    }
}
