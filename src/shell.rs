//! Interactive shell: the event router for a long-lived session.
//!
//! Each input line is parsed into a [`ShellCommand`] and dispatched to
//! the [`ContactManager`]. Contact forms are filled in field by field
//! from the same input; entering `.` (or end of input) cancels the form.
//!
//! ```text
//! contacts> search jane
//! contacts> tag work
//! contacts> edit 3
//! full name [Jane Doe]: Jane Roe
//! ```

use anyhow::Result;
use contact_manager_core::models::{ContactForm, ContactId};
use contact_manager_core::sync::ContactManager;
use tracing::debug;

use crate::console::{format_contact, format_tags, prompt, Input};

const HELP: &str = "\
Commands:
  list                   show every contact
  search <text>          filter contacts by text (empty clears)
  tag <tag>              filter by tag; repeat to deselect
  clear                  remove any filter
  tags                   show the tag list
  add-tag <tag>          add a tag to the tag list
  remove-tag <tag>       remove a tag you added
  show <id>              show one contact
  new                    create a contact
  edit <id>              edit a contact
  edit-by <phone> <email>  edit the contact with this phone and email
  delete <id>            delete a contact (asks first)
  refresh                reload contacts from the server
  help                   show this help
  quit                   leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Search(String),
    Tag(String),
    Clear,
    Tags,
    AddTag(String),
    RemoveTag(String),
    Show(ContactId),
    New,
    Edit(ContactId),
    EditBy { phone_number: String, email: String },
    Delete(ContactId),
    Refresh,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let need = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("usage: {} <{}>", word, what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word {
        "list" | "ls" => ShellCommand::List,
        "search" | "/" => ShellCommand::Search(rest.to_string()),
        "tag" => ShellCommand::Tag(need("tag")?),
        "clear" => ShellCommand::Clear,
        "tags" => ShellCommand::Tags,
        "add-tag" => ShellCommand::AddTag(need("tag")?),
        "remove-tag" => ShellCommand::RemoveTag(need("tag")?),
        "show" => ShellCommand::Show(ContactId::parse(&need("id")?)),
        "new" | "add" => ShellCommand::New,
        "edit" => ShellCommand::Edit(ContactId::parse(&need("id")?)),
        "edit-by" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(phone), Some(email), None) => ShellCommand::EditBy {
                    phone_number: phone.to_string(),
                    email: email.to_string(),
                },
                _ => return Err("usage: edit-by <phone> <email>".to_string()),
            }
        }
        "delete" | "rm" => ShellCommand::Delete(ContactId::parse(&need("id")?)),
        "refresh" => ShellCommand::Refresh,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };
    Ok(Some(command))
}

/// Fill in a form field by field. Empty answers keep the current value.
///
/// Returns `None` if the user cancels with `.` or input ends.
pub async fn fill_form(input: &Input, initial: ContactForm) -> Result<Option<ContactForm>> {
    let mut form = initial;
    let fields: [(&str, &mut String); 4] = [
        ("full name", &mut form.full_name),
        ("email", &mut form.email),
        ("phone number", &mut form.phone_number),
        ("tags (comma separated)", &mut form.tags),
    ];
    for (label, value) in fields {
        let question = if value.is_empty() {
            format!("{}: ", label)
        } else {
            format!("{} [{}]: ", label, value)
        };
        let answer = match prompt(input, &question).await? {
            Some(answer) => answer,
            None => return Ok(None),
        };
        let answer = answer.trim();
        if answer == "." {
            return Ok(None);
        }
        if !answer.is_empty() {
            *value = answer.to_string();
        }
    }
    Ok(Some(form))
}

/// Run the shell until `quit` or end of input.
pub async fn run_shell(manager: &mut ContactManager, input: Input) -> Result<()> {
    println!("Type 'help' for commands.");
    manager.refresh().await?;

    loop {
        let line = match prompt(&input, "contacts> ").await? {
            Some(line) => line,
            None => break,
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                eprintln!("{}", usage);
                continue;
            }
        };
        debug!(?command, "shell command");
        if command == ShellCommand::Quit {
            break;
        }
        // Errors were already reported through the notifier; keep going.
        if let Err(err) = dispatch(manager, &input, command).await {
            debug!(error = %err, "command failed");
        }
    }
    Ok(())
}

async fn dispatch(
    manager: &mut ContactManager,
    input: &Input,
    command: ShellCommand,
) -> Result<()> {
    match command {
        ShellCommand::List => {
            manager.clear_filter();
        }
        ShellCommand::Search(pattern) => {
            manager.filter_by_search(&pattern);
        }
        ShellCommand::Tag(tag) => {
            manager.filter_by_tag(&tag);
        }
        ShellCommand::Clear => {
            manager.clear_filter();
        }
        ShellCommand::Tags => {
            let selected = match manager.filter() {
                contact_manager_core::Filter::Tag(tag) => Some(tag.as_str()),
                _ => None,
            };
            println!("{}", format_tags(manager.tags().tags(), selected));
        }
        ShellCommand::AddTag(raw) => {
            manager.add_tag(&raw).await?;
        }
        ShellCommand::RemoveTag(tag) => {
            if !manager.remove_tag(&tag) {
                eprintln!("'{}' is not a tag you added.", tag);
            }
        }
        ShellCommand::Show(id) => match manager.lookup(&id) {
            Some(contact) => print!("{}", format_contact(contact)),
            None => eprintln!("No contact with id {}.", id),
        },
        ShellCommand::New => {
            manager.open_create_form();
            submit_or_cancel(manager, input, ContactForm::default()).await?;
        }
        ShellCommand::Edit(id) => edit(manager, input, &id).await?,
        ShellCommand::EditBy {
            phone_number,
            email,
        } => match manager.resolve_id(&phone_number, &email) {
            Some(id) => edit(manager, input, &id).await?,
            None => eprintln!("No contact with phone {} and email {}.", phone_number, email),
        },
        ShellCommand::Delete(id) => {
            if manager.lookup(&id).is_none() {
                eprintln!("No contact with id {}.", id);
            } else {
                manager.request_delete(&id).await?;
            }
        }
        ShellCommand::Refresh => manager.refresh().await?,
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

async fn edit(manager: &mut ContactManager, input: &Input, id: &ContactId) -> Result<()> {
    match manager.begin_edit(id) {
        Some(form) => submit_or_cancel(manager, input, form).await,
        None => {
            eprintln!("No contact with id {}.", id);
            Ok(())
        }
    }
}

async fn submit_or_cancel(
    manager: &mut ContactManager,
    input: &Input,
    initial: ContactForm,
) -> Result<()> {
    let mut current = initial;
    loop {
        match fill_form(input, current).await? {
            None => {
                manager.cancel_form();
                println!("Cancelled.");
                return Ok(());
            }
            Some(form) => match manager.submit_form(&form).await {
                Ok(()) => return Ok(()),
                // Form stays open after a rejected field; ask again.
                Err(err) if err.is_validation() => current = form,
                Err(err) => {
                    manager.cancel_form();
                    return Err(err.into());
                }
            },
        }
    }
}
