//! # Contact Manager CLI (`contacts`)
//!
//! ## Usage
//!
//! ```bash
//! contacts --config ./config/contacts.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `contacts list` | Show every contact and the tag list |
//! | `contacts search <text>` | Filter contacts by text |
//! | `contacts tag <tag>` | Filter contacts by tag |
//! | `contacts tags` | Show the derived tag list |
//! | `contacts show <id>` | Show one contact |
//! | `contacts add ...` | Create a contact |
//! | `contacts update <id> ...` | Change some fields of a contact |
//! | `contacts delete <id>` | Delete a contact |
//! | `contacts shell` | Interactive session |
//! | `contacts serve` | Start the reference contacts API |
//! | `contacts completions <shell>` | Print shell completions |

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use contact_manager::commands::{self, ContactEdits};
use contact_manager::config;
use contact_manager::server;
use contact_manager::telemetry::init_tracing;
use contact_manager_core::models::{ContactForm, ContactId};

/// Contact Manager CLI: a tag-indexed contact list kept in sync with a
/// remote contacts API.
#[derive(Parser)]
#[command(
    name = "contacts",
    about = "Contact Manager: a tag-indexed contact list kept in sync with a remote contacts API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/contacts.toml` if it exists, otherwise
    /// built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (`-v` info, `-vv` debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every contact and the tag list.
    List,

    /// Filter contacts by text, matched case-insensitively against
    /// name, email, phone number, and tags.
    Search {
        /// Text to look for.
        pattern: String,
    },

    /// Filter contacts by tag.
    Tag {
        /// Tag name, as listed by `contacts tags`.
        tag: String,
    },

    /// Show the tag list derived from every contact.
    Tags,

    /// Show one contact.
    Show {
        /// Contact id.
        id: String,
    },

    /// Create a contact.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// Comma-separated tags.
        #[arg(long, default_value = "")]
        tags: String,
    },

    /// Change some fields of a contact; the rest keep their values.
    Update {
        /// Contact id.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Comma-separated tags (replaces the current tags).
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a contact.
    Delete {
        /// Contact id.
        id: String,
        /// Do not ask for confirmation.
        #[arg(long, short)]
        yes: bool,
    },

    /// Start an interactive session.
    ///
    /// Tags added in the session stay in the tag list until it ends.
    Shell,

    /// Start the reference contacts API server.
    ///
    /// Binds to `[server].bind` and serves `[remote].collection_path`
    /// from memory.
    Serve {
        /// JSON file with an array of contacts to start with.
        #[arg(long)]
        seed: Option<PathBuf>,
    },

    /// Print shell completions.
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "contacts", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config_or_default(cli.config.as_deref())?;
    init_tracing(&cfg.logging.filter, cli.verbose);

    match cli.command {
        Commands::List => commands::run_list(&cfg).await?,
        Commands::Search { pattern } => commands::run_search(&cfg, &pattern).await?,
        Commands::Tag { tag } => commands::run_tag_filter(&cfg, &tag).await?,
        Commands::Tags => commands::run_tags(&cfg).await?,
        Commands::Show { id } => commands::run_show(&cfg, &ContactId::parse(&id)).await?,
        Commands::Add {
            name,
            email,
            phone,
            tags,
        } => {
            let form = ContactForm {
                full_name: name,
                email,
                phone_number: phone,
                tags,
            };
            commands::run_add(&cfg, form).await?;
        }
        Commands::Update {
            id,
            name,
            email,
            phone,
            tags,
        } => {
            let edits = ContactEdits {
                full_name: name,
                email,
                phone_number: phone,
                tags,
            };
            commands::run_update(&cfg, &ContactId::parse(&id), edits).await?;
        }
        Commands::Delete { id, yes } => {
            commands::run_delete(&cfg, &ContactId::parse(&id), yes).await?;
        }
        Commands::Shell => commands::run_interactive(&cfg).await?,
        Commands::Serve { seed } => server::run_server(&cfg, seed.as_deref()).await?,
        Commands::Completions { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}
