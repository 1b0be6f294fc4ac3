//! Integration tests: the sync protocol over real HTTP against the
//! reference contacts server, and the `contacts` binary end to end.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contact_manager::config::RemoteConfig;
use contact_manager::http_remote::HttpRemote;
use contact_manager::server::serve;
use contact_manager_core::models::{Contact, ContactForm, ContactId, ContactPayload};
use contact_manager_core::remote::memory::MemoryRemote;
use contact_manager_core::remote::RemoteStore;
use contact_manager_core::{ContactError, ContactManager, Notice, Notifier, TagIndex, View};
use tempfile::TempDir;

// ─── Helpers ────────────────────────────────────────────────────────

struct NullView;

impl View for NullView {
    fn render_tags(&self, _tags: &[String], _selected: Option<&str>) {}
    fn render_contacts(&self, _contacts: &[Contact]) {}
    fn show_no_matches(&self, _visible: bool) {}
    fn render_form(&self, _contact: &Contact) {}
    fn show_form(&self, _visible: bool) {}
}

#[derive(Default)]
struct Notices(Mutex<Vec<Notice>>);

#[async_trait]
impl Notifier for Notices {
    async fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }

    async fn confirm_delete(&self, _id: &ContactId, _contact: Option<&Contact>) -> bool {
        true
    }
}

fn payload(name: &str, phone: &str, tags: &str) -> ContactPayload {
    ContactPayload {
        full_name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase().replace(' ', ".")),
        phone_number: phone.to_string(),
        tags: tags.to_string(),
    }
}

fn form(name: &str, phone: &str, tags: &str) -> ContactForm {
    let p = payload(name, phone, tags);
    ContactForm {
        full_name: p.full_name,
        email: p.email,
        phone_number: p.phone_number,
        tags: p.tags,
    }
}

/// Start the reference server on a free port, seeded with two contacts.
async fn start_server() -> (SocketAddr, Arc<MemoryRemote>) {
    let remote = Arc::new(MemoryRemote::new());
    remote.insert(payload("Jane Doe", "555", "work,vip"));
    remote.insert(payload("Bob Jones", "777", "family"));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let served = remote.clone();
    tokio::spawn(async move {
        serve(listener, served, "/api/contacts").await.unwrap();
    });
    (addr, remote)
}

fn remote_config(addr: SocketAddr) -> RemoteConfig {
    RemoteConfig {
        base_url: format!("http://{}", addr),
        collection_path: "/api/contacts".to_string(),
        timeout_secs: 5,
    }
}

// ─── HttpRemote against the reference server ────────────────────────

#[tokio::test]
async fn test_http_remote_crud() {
    let (addr, server) = start_server().await;
    let http = HttpRemote::new(&remote_config(addr)).unwrap();

    let listed = http.list().await.unwrap();
    assert_eq!(listed, server.snapshot());

    http.create(&payload("Ann Lee", "999", "")).await.unwrap();
    assert_eq!(server.snapshot().len(), 3);

    http.update(&ContactId::Number(1), &payload("Jane Roe", "555", "work"))
        .await
        .unwrap();
    assert_eq!(
        server.get(&ContactId::Number(1)).unwrap().full_name,
        "Jane Roe"
    );

    http.delete(&ContactId::Number(2)).await.unwrap();
    assert!(server.get(&ContactId::Number(2)).is_none());
}

#[tokio::test]
async fn test_http_remote_reports_status_errors() {
    let (addr, _server) = start_server().await;
    let http = HttpRemote::new(&remote_config(addr)).unwrap();

    let err = http.delete(&ContactId::Number(99)).await.unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("404"), "unexpected error: {}", msg);
    assert!(msg.contains("not_found"), "unexpected error: {}", msg);

    let mut incomplete = payload("Ann Lee", "999", "");
    incomplete.email.clear();
    let err = http.create(&incomplete).await.unwrap_err();
    assert!(format!("{:#}", err).contains("400"));
}

#[tokio::test]
async fn test_server_health() {
    let (addr, _server) = start_server().await;
    let resp = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

// ─── ContactManager over HTTP ───────────────────────────────────────

async fn manager_for(addr: SocketAddr) -> (ContactManager, Arc<Notices>) {
    let http = Arc::new(HttpRemote::new(&remote_config(addr)).unwrap());
    let notices = Arc::new(Notices::default());
    let mut manager = ContactManager::new(http, Arc::new(NullView), notices.clone());
    manager.refresh().await.unwrap();
    (manager, notices)
}

#[tokio::test]
async fn test_create_over_http_mirrors_server() {
    let (addr, server) = start_server().await;
    let (mut manager, notices) = manager_for(addr).await;

    manager
        .create_contact(&form("Ann Lee", "999", "Food, gym"))
        .await
        .unwrap();

    let snapshot = server.snapshot();
    assert_eq!(manager.contacts().contacts(), snapshot.as_slice());
    assert_eq!(
        manager.tags().tags(),
        TagIndex::new().derive(&snapshot).as_slice()
    );
    assert_eq!(manager.tags().tags(), ["work", "vip", "family", "food", "gym"]);
    assert_eq!(*notices.0.lock().unwrap(), vec![Notice::Added]);
}

#[tokio::test]
async fn test_failed_update_over_http_keeps_snapshot() {
    let (addr, _server) = start_server().await;
    let (mut manager, notices) = manager_for(addr).await;
    let before = manager.contacts().contacts().to_vec();

    let err = manager
        .update_contact(&ContactId::Number(42), &form("Nobody", "000", ""))
        .await
        .unwrap_err();

    assert!(matches!(err, ContactError::Transport { .. }));
    assert_eq!(manager.contacts().contacts(), before.as_slice());
    let notices = notices.0.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_failure());
}

#[tokio::test]
async fn test_delete_and_search_over_http() {
    let (addr, _server) = start_server().await;
    let (mut manager, _notices) = manager_for(addr).await;

    let id = manager.resolve_id("777", "bob.jones@x.com").unwrap();
    assert!(manager.request_delete(&id).await.unwrap());
    assert!(manager.filter_by_search("bob").is_empty());
    assert!(!manager.tags().contains("family"));
}

// ─── CLI binary ─────────────────────────────────────────────────────

fn write_config(tmp: &TempDir, addr: SocketAddr) -> PathBuf {
    let path = tmp.path().join("contacts.toml");
    std::fs::write(
        &path,
        format!(
            "[remote]\nbase_url = \"http://{}\"\n\
             collection_path = \"/api/contacts\"\ntimeout_secs = 5\n",
            addr
        ),
    )
    .unwrap();
    path
}

async fn run_contacts(config: PathBuf, args: &[&str]) -> (String, String, bool) {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        let output = Command::new(env!("CARGO_BIN_EXE_contacts"))
            .arg("--config")
            .arg(&config)
            .args(&args)
            .output()
            .expect("failed to run contacts binary");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.success(),
        )
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_list_search_and_tags() {
    let (addr, _server) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, addr);

    let (stdout, _, ok) = run_contacts(config.clone(), &["list"]).await;
    assert!(ok);
    assert!(stdout.contains("Jane Doe"));
    assert!(stdout.contains("Bob Jones"));
    assert!(stdout.contains("Tags: work, vip, family"));

    let (stdout, _, ok) = run_contacts(config.clone(), &["search", "JANE"]).await;
    assert!(ok);
    assert!(stdout.contains("Jane Doe"));
    assert!(!stdout.contains("Bob Jones"));

    let (stdout, _, ok) = run_contacts(config.clone(), &["search", "nobody"]).await;
    assert!(ok);
    assert!(stdout.contains("No matching contacts."));

    let (stdout, _, ok) = run_contacts(config, &["tags"]).await;
    assert!(ok);
    assert_eq!(stdout.trim(), "Tags: work, vip, family");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_mutations() {
    let (addr, server) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, addr);

    let (stdout, _, ok) = run_contacts(
        config.clone(),
        &[
            "add", "--name", "Ann Lee", "--email", "ann@x.com", "--phone", "999", "--tags",
            "Food!!",
        ],
    )
    .await;
    assert!(ok);
    assert!(stdout.contains("The contact has been added."));
    assert_eq!(server.snapshot().len(), 3);

    let (_, _, ok) = run_contacts(config.clone(), &["update", "1", "--tags", "work"]).await;
    assert!(ok);
    let jane = server.get(&ContactId::Number(1)).unwrap();
    assert_eq!(jane.tags, "work");
    assert_eq!(jane.full_name, "Jane Doe");

    let (_, stderr, ok) = run_contacts(
        config.clone(),
        &["add", "--name", "X", "--email", "", "--phone", "1"],
    )
    .await;
    assert!(!ok);
    assert!(stderr.contains("email must not be empty"));

    let (stdout, _, ok) = run_contacts(config.clone(), &["delete", "2", "--yes"]).await;
    assert!(ok);
    assert!(stdout.contains("The contact has been deleted."));
    assert!(server.get(&ContactId::Number(2)).is_none());

    let (_, _, ok) = run_contacts(config, &["show", "2"]).await;
    assert!(!ok);
}
