//! # Contact Manager Core
//!
//! Shared, WASM-safe logic for Contact Manager: the contact model, the
//! in-memory contact store, the tag index, and the refetch-after-write
//! sync protocol that ties remote mutations to re-rendering.
//!
//! This crate contains no tokio, network I/O, or terminal code. Every
//! collaborator it talks to (the remote store, the view, the notifier) is
//! a trait, so it compiles to both native targets and
//! `wasm32-unknown-unknown`.

pub mod error;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;
pub mod tags;
pub mod view;

pub use error::ContactError;
pub use models::{Contact, ContactForm, ContactId, ContactPayload};
pub use remote::RemoteStore;
pub use store::ContactStore;
pub use sync::{ContactManager, Filter};
pub use tags::TagIndex;
pub use view::{Notice, Notifier, View};
