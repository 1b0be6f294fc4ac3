//! One-shot CLI commands.
//!
//! Each command builds a [`ContactManager`] over the HTTP remote, loads
//! the current snapshot, and runs a single operation through it.

use std::sync::Arc;

use anyhow::{bail, Result};
use contact_manager_core::models::{ContactForm, ContactId};
use contact_manager_core::sync::ContactManager;

use crate::config::Config;
use crate::console::{
    format_contact, format_tags, stdin_input, Input, TerminalNotifier, TerminalView,
};
use crate::http_remote::HttpRemote;
use crate::shell::run_shell;

/// Field overrides for `contacts update`; `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct ContactEdits {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub tags: Option<String>,
}

impl ContactEdits {
    pub fn apply(self, mut form: ContactForm) -> ContactForm {
        if let Some(v) = self.full_name {
            form.full_name = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.phone_number {
            form.phone_number = v;
        }
        if let Some(v) = self.tags {
            form.tags = v;
        }
        form
    }

    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.tags.is_none()
    }
}

struct Session {
    manager: ContactManager,
    input: Input,
}

fn open_session(config: &Config, assume_yes: bool) -> Result<(Session, Arc<TerminalView>)> {
    let remote = Arc::new(HttpRemote::new(&config.remote)?);
    let view = Arc::new(TerminalView::new());
    let input = stdin_input();
    let notifier = Arc::new(TerminalNotifier::new(input.clone(), assume_yes));
    let manager = ContactManager::new(remote, view.clone(), notifier);
    Ok((Session { manager, input }, view))
}

/// Connect and load the snapshot without printing it.
async fn connect(config: &Config, assume_yes: bool) -> Result<Session> {
    let (mut session, view) = open_session(config, assume_yes)?;
    view.set_muted(true);
    let loaded = session.manager.refresh().await;
    view.set_muted(false);
    loaded?;
    Ok(session)
}

pub async fn run_list(config: &Config) -> Result<()> {
    let mut session = connect(config, false).await?;
    session.manager.clear_filter();
    Ok(())
}

pub async fn run_search(config: &Config, pattern: &str) -> Result<()> {
    let mut session = connect(config, false).await?;
    session.manager.filter_by_search(pattern);
    Ok(())
}

pub async fn run_tag_filter(config: &Config, tag: &str) -> Result<()> {
    let mut session = connect(config, false).await?;
    session.manager.filter_by_tag(tag);
    Ok(())
}

pub async fn run_tags(config: &Config) -> Result<()> {
    let session = connect(config, false).await?;
    println!("{}", format_tags(session.manager.tags().tags(), None));
    Ok(())
}

pub async fn run_show(config: &Config, id: &ContactId) -> Result<()> {
    let session = connect(config, false).await?;
    match session.manager.lookup(id) {
        Some(contact) => {
            print!("{}", format_contact(contact));
            Ok(())
        }
        None => bail!("No contact with id {}", id),
    }
}

pub async fn run_add(config: &Config, form: ContactForm) -> Result<()> {
    let mut session = connect(config, false).await?;
    session.manager.create_contact(&form).await?;
    Ok(())
}

pub async fn run_update(config: &Config, id: &ContactId, edits: ContactEdits) -> Result<()> {
    if edits.is_empty() {
        bail!("Nothing to update: pass at least one of --name, --email, --phone, --tags");
    }
    let mut session = connect(config, false).await?;
    let current = match session.manager.lookup(id) {
        Some(contact) => ContactForm::from(contact),
        None => bail!("No contact with id {}", id),
    };
    session
        .manager
        .update_contact(id, &edits.apply(current))
        .await?;
    Ok(())
}

pub async fn run_delete(config: &Config, id: &ContactId, assume_yes: bool) -> Result<()> {
    let mut session = connect(config, assume_yes).await?;
    if session.manager.lookup(id).is_none() {
        bail!("No contact with id {}", id);
    }
    if !session.manager.request_delete(id).await? {
        println!("Not deleted.");
    }
    Ok(())
}

/// The shell loads and prints the snapshot itself on start.
pub async fn run_interactive(config: &Config) -> Result<()> {
    let (Session { mut manager, input }, _) = open_session(config, false)?;
    run_shell(&mut manager, input).await
}
