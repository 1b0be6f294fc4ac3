//! Data types shared by the contact store, the tag index, and the remote
//! store collaborators.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ContactError;

/// Identifier assigned by the remote store.
///
/// Opaque to the client: it is only compared, echoed back in item URLs,
/// and displayed. Remote stores may use numeric or string identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Number(u64),
    Text(String),
}

impl ContactId {
    /// Parse a user-supplied identifier, preferring the numeric form.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<u64>() {
            Ok(n) => ContactId::Number(n),
            Err(_) => ContactId::Text(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactId::Number(n) => write!(f, "{}", n),
            ContactId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ContactId {
    fn from(n: u64) -> Self {
        ContactId::Number(n)
    }
}

/// A contact record as served by the remote store.
///
/// `tags` is the raw, unnormalized comma-separated string the user typed;
/// the [`TagIndex`](crate::tags::TagIndex) derives normalized tags from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: Option<ContactId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: String,
}

impl Contact {
    /// The reserved blank contact backing an empty "create" form.
    pub fn blank() -> Self {
        Self {
            id: None,
            full_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            tags: String::new(),
        }
    }

    /// Searchable fields, in declaration order. The id is never searched.
    pub fn text_fields(&self) -> [&str; 4] {
        [&self.full_name, &self.email, &self.phone_number, &self.tags]
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Values entered in the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub tags: String,
}

impl From<&Contact> for ContactForm {
    fn from(contact: &Contact) -> Self {
        Self {
            full_name: contact.full_name.clone(),
            email: contact.email.clone(),
            phone_number: contact.phone_number.clone(),
            tags: contact.tags.clone(),
        }
    }
}

impl ContactForm {
    /// Validate required fields and build the request body.
    ///
    /// Every field except `tags` must be non-empty; the first empty one
    /// aborts the request before anything is sent.
    pub fn to_payload(&self) -> Result<ContactPayload, ContactError> {
        let required = [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ContactError::MissingField(*field));
        }

        Ok(ContactPayload {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            tags: self.tags.clone(),
        })
    }
}

/// Flat JSON body for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub tags: String,
}

impl ContactPayload {
    /// Materialize the payload as a stored contact with the given id.
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id: Some(id),
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            tags: self.tags,
        }
    }
}
