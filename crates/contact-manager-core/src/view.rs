//! Rendering and notification collaborators.
//!
//! The core never draws anything itself. After every state change it
//! tells a [`View`] what to redraw, and it reports outcomes and asks for
//! confirmations through a [`Notifier`]. Both are traits so a browser
//! front end, a terminal, or a test double can sit behind them.

use std::fmt;

use async_trait::async_trait;

use crate::models::{Contact, ContactId};

/// Redraw target for tag list, contact list, and the contact form.
pub trait View: Send + Sync {
    /// Redraw the tag list. `selected` is the tag currently filtering the
    /// contact list, if any.
    fn render_tags(&self, tags: &[String], selected: Option<&str>);

    /// Redraw the contact list with the given contacts.
    fn render_contacts(&self, contacts: &[Contact]);

    /// Show or hide the "no matching contacts" message.
    fn show_no_matches(&self, visible: bool);

    /// Redraw the create/edit form pre-filled from `contact`.
    fn render_form(&self, contact: &Contact);

    /// Show or hide the create/edit form.
    fn show_form(&self, visible: bool);
}

/// User-facing outcome messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added,
    Updated,
    Deleted,
    /// A tag was rejected by validation.
    InvalidTag(String),
    /// A required form field was empty; nothing was sent.
    MissingField(&'static str),
    /// A remote call failed; nothing was changed locally.
    Failed {
        operation: &'static str,
        message: String,
    },
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::Added | Notice::Updated | Notice::Deleted)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added => f.write_str("The contact has been added."),
            Notice::Updated => f.write_str("The contact has been updated."),
            Notice::Deleted => f.write_str("The contact has been deleted."),
            Notice::InvalidTag(_) => f.write_str("Sorry, that's not a valid tag."),
            Notice::MissingField(field) => {
                write!(f, "Please fill in {}.", field.replace('_', " "))
            }
            Notice::Failed { operation, message } => {
                write!(f, "Could not {}: {}", operation, message)
            }
        }
    }
}

/// Asynchronous notifications and confirmations.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the user about an outcome.
    async fn notify(&self, notice: Notice);

    /// Ask the user to confirm deleting `contact`.
    async fn confirm_delete(&self, id: &ContactId, contact: Option<&Contact>) -> bool;
}
