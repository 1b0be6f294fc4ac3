//! Tag normalization, validation, and the derived tag index.
//!
//! Tags are never stored remotely as entities. They are a client-side
//! view over every contact's raw `tags` string, plus any tags the user
//! added during the session ("curated" tags).
//!
//! # Derivation
//!
//! ```text
//! contacts ──filter valid──▶ lowercase ──split ','──▶ normalize ──┐
//!                                                                 ▼
//!                            curated tags ─────────────▶ concat ──▶ dedup
//! ```
//!
//! Ordering is curated tags first (in the order they were added), then
//! derived tags in first-seen order across the contact snapshot.

use tracing::{debug, warn};

use crate::error::ContactError;
use crate::models::Contact;

/// Whether `s` can yield a tag: non-empty with at least one ASCII
/// alphanumeric character.
pub fn is_valid_tag(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_alphanumeric())
}

/// Strip every character that is not ASCII alphanumeric.
///
/// Case is preserved; callers lowercase first.
pub fn normalize(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Remove repeated elements, keeping the first occurrence of each.
///
/// Idempotent: deduplicating an already deduplicated list is a no-op.
pub fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut kept: Vec<T> = Vec::new();
    for item in items {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    kept
}

/// Lowercase, split on commas, and normalize one contact's raw tag string.
///
/// Tokens that normalize to nothing (e.g. `"!!"` or the gap in `"a,,b"`)
/// are dropped.
fn tokens(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(|token| normalize(&token.to_lowercase()))
        .filter(|tag| !tag.is_empty())
}

/// The curated + derived tag list.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    /// Tags added explicitly by the user, in insertion order.
    curated: Vec<String>,
    /// Current list: curated tags followed by derived tags.
    tags: Vec<String>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tag list.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Tags added by the user, independent of any contact.
    pub fn curated(&self) -> &[String] {
        &self.curated
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Compute the tag list for a contact snapshot, merged after the
    /// curated tags, without modifying the index.
    pub fn derive(&self, contacts: &[Contact]) -> Vec<String> {
        let derived = contacts
            .iter()
            .filter(|contact| is_valid_tag(&contact.tags))
            .flat_map(|contact| tokens(&contact.tags));
        dedup(self.curated.iter().cloned().chain(derived))
    }

    /// Rebuild the tag list from scratch for a new contact snapshot.
    ///
    /// Derived tags not reproduced by `contacts` are gone afterwards;
    /// curated tags are re-merged.
    pub fn rebuild(&mut self, contacts: &[Contact]) {
        self.tags = self.derive(contacts);
        debug!(
            tags = self.tags.len(),
            curated = self.curated.len(),
            "rebuilt tag index"
        );
    }

    /// Add a user-entered tag.
    ///
    /// The raw input is lowercased and normalized, so `"Food!!"` becomes
    /// `"food"`. Input without any alphanumeric character is rejected and
    /// the list is left unchanged. Returns the stored tag.
    pub fn add(&mut self, raw: &str) -> Result<String, ContactError> {
        if !is_valid_tag(raw) {
            warn!(raw, "rejected invalid tag");
            return Err(ContactError::InvalidTag(raw.to_string()));
        }

        let tag = normalize(&raw.to_lowercase());
        if !self.curated.contains(&tag) {
            self.curated.push(tag.clone());
        }
        self.tags.push(tag.clone());
        self.tags = dedup(std::mem::take(&mut self.tags));
        Ok(tag)
    }

    /// Drop a curated tag. It stays in the list only while some contact
    /// in `contacts` still derives it.
    ///
    /// Returns `false` if `tag` was not a curated tag.
    pub fn remove(&mut self, tag: &str, contacts: &[Contact]) -> bool {
        let before = self.curated.len();
        self.curated.retain(|t| t != tag);
        if self.curated.len() == before {
            return false;
        }
        self.rebuild(contacts);
        true
    }
}
