//! # Contact Manager
//!
//! A contact list client that keeps an in-memory copy of a remote
//! contacts API in sync, derives a searchable tag index from the
//! records, and filters the list by free text or by tag.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────┐
//! │  CLI / shell │──▶│   ContactManager   │──▶│  HttpRemote  │──▶ contacts API
//! │ (event router)│   │ store + tag index  │   │  (reqwest)   │
//! └──────────────┘   └─────────┬──────────┘   └──────────────┘
//!                              ▼
//!                     ┌──────────────────┐
//!                     │ TerminalView /   │
//!                     │ TerminalNotifier │
//!                     └──────────────────┘
//! ```
//!
//! Every write is followed by a full refetch, a tag rebuild, and a
//! redraw; a failed write stops before any of that.
//!
//! ## Quick Start
//!
//! ```bash
//! contacts serve &                      # reference API on 127.0.0.1:3000
//! contacts add --name "Jane Doe" --email j@x.com --phone 555 --tags work,vip
//! contacts search jane
//! contacts tags
//! contacts shell                        # interactive session
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`http_remote`] | reqwest-backed remote store |
//! | [`console`] | Terminal view and notifier |
//! | [`shell`] | Interactive event router |
//! | [`commands`] | One-shot CLI commands |
//! | [`server`] | Reference contacts API server |
//! | [`telemetry`] | Tracing subscriber setup |

pub mod commands;
pub mod config;
pub mod console;
pub mod http_remote;
pub mod server;
pub mod shell;
pub mod telemetry;
