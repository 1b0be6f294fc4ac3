//! Terminal implementations of the [`View`] and [`Notifier`] collaborators.
//!
//! The view prints tag and contact listings to stdout. The notifier
//! prints successes to stdout, failures to stderr, and reads delete
//! confirmations from the shared input line source, so the interactive
//! shell and its confirmation prompts never compete for stdin.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use contact_manager_core::models::{Contact, ContactId};
use contact_manager_core::view::{Notice, Notifier, View};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Line-oriented user input shared by the shell and the notifier.
pub type Input = Arc<tokio::sync::Mutex<Lines<Box<dyn AsyncBufRead + Unpin + Send>>>>;

pub fn stdin_input() -> Input {
    input_from(Box::new(BufReader::new(tokio::io::stdin())))
}

pub fn input_from(reader: Box<dyn AsyncBufRead + Unpin + Send>) -> Input {
    Arc::new(tokio::sync::Mutex::new(reader.lines()))
}

/// Next input line, or `None` at end of input.
pub async fn read_line(input: &Input) -> Result<Option<String>> {
    Ok(input.lock().await.next_line().await?)
}

/// Print `prompt` without a newline and read the answer.
pub async fn prompt(input: &Input, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    read_line(input).await
}

// ============ Formatting ============

pub fn format_tags(tags: &[String], selected: Option<&str>) -> String {
    if tags.is_empty() {
        return "Tags: (none)".to_string();
    }
    let rendered: Vec<String> = tags
        .iter()
        .map(|t| {
            if Some(t.as_str()) == selected {
                format!("[{}]", t)
            } else {
                t.clone()
            }
        })
        .collect();
    format!("Tags: {}", rendered.join(", "))
}

pub fn format_contacts(contacts: &[Contact]) -> String {
    let mut out = format!(
        "{:<6} {:<24} {:<28} {:<16} TAGS\n",
        "ID", "NAME", "EMAIL", "PHONE"
    );
    for c in contacts {
        let id = c.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{:<6} {:<24} {:<28} {:<16} {}\n",
            id, c.full_name, c.email, c.phone_number, c.tags
        ));
    }
    out
}

pub fn format_contact(contact: &Contact) -> String {
    let id = contact
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "(new)".to_string());
    format!(
        "id:           {}\nfull_name:    {}\nemail:        {}\nphone_number: {}\ntags:         {}\n",
        id, contact.full_name, contact.email, contact.phone_number, contact.tags
    )
}

// ============ View ============

/// Prints listings to stdout.
///
/// While muted, nothing is printed; one-shot commands mute the initial
/// load so only the output they ask for appears.
pub struct TerminalView {
    muted: AtomicBool,
    form_visible: AtomicBool,
    form: Mutex<Contact>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            muted: AtomicBool::new(false),
            form_visible: AtomicBool::new(false),
            form: Mutex::new(Contact::blank()),
        }
    }

    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TerminalView {
    fn render_tags(&self, tags: &[String], selected: Option<&str>) {
        if !self.muted() {
            println!("{}", format_tags(tags, selected));
        }
    }

    fn render_contacts(&self, contacts: &[Contact]) {
        if !self.muted() {
            print!("{}", format_contacts(contacts));
        }
    }

    fn show_no_matches(&self, visible: bool) {
        if visible && !self.muted() {
            println!("No matching contacts.");
        }
    }

    fn render_form(&self, contact: &Contact) {
        *self.form.lock().unwrap_or_else(PoisonError::into_inner) = contact.clone();
    }

    fn show_form(&self, visible: bool) {
        self.form_visible.store(visible, Ordering::SeqCst);
        if visible && !self.muted() {
            let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
            if form.id.is_some() {
                println!("--- Edit contact ---");
                print!("{}", format_contact(&form));
            } else {
                println!("--- New contact ---");
            }
        }
    }
}

// ============ Notifier ============

pub struct TerminalNotifier {
    input: Input,
    assume_yes: bool,
}

impl TerminalNotifier {
    pub fn new(input: Input, assume_yes: bool) -> Self {
        Self { input, assume_yes }
    }
}

#[async_trait]
impl Notifier for TerminalNotifier {
    async fn notify(&self, notice: Notice) {
        if notice.is_failure() {
            eprintln!("{}", notice);
        } else {
            println!("{}", notice);
        }
    }

    async fn confirm_delete(&self, id: &ContactId, contact: Option<&Contact>) -> bool {
        if self.assume_yes {
            return true;
        }
        if !atty::is(atty::Stream::Stdin) {
            eprintln!("Refusing to delete contact {} without confirmation (pass --yes).", id);
            return false;
        }
        let label = contact
            .map(|c| format!("{} ({})", c.full_name, id))
            .unwrap_or_else(|| id.to_string());
        match prompt(&self.input, &format!("Delete {}? Are you sure? [y/N] ", label)).await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}
