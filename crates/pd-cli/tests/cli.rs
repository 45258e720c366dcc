//! Integration tests: `posterdraft` commands end to end (pd-cli).
//!
//! Commands run against a JSON store in a temp dir, offline image
//! resolution and a canned image gateway.

use async_trait::async_trait;
use clap::Parser;
use pd_ai::{GenerateError, GenerateRequest, GeneratedImage, ImageGateway};
use pd_cli::{App, Cli};
use pd_render::InlineResolver;
use pd_store::{DesignStore, JsonFileStore};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const GENERATED_URL: &str = "https://cdn.example/generated.png";

#[derive(Default)]
struct CannedGateway {
    calls: AtomicUsize,
}

#[async_trait]
impl ImageGateway for CannedGateway {
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedImage, GenerateError> {
        request.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedImage {
            image_url: GENERATED_URL.to_string(),
        })
    }
}

struct Harness {
    dir: TempDir,
    store: Arc<JsonFileStore>,
    gateway: Arc<CannedGateway>,
    app: App,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("designs.json")));
        let gateway = Arc::new(CannedGateway::default());
        let app = App::new(store.clone(), Arc::new(InlineResolver), gateway.clone());
        Self {
            dir,
            store,
            gateway,
            app,
        }
    }

    async fn run(&self, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("posterdraft").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        self.app.run(cli.command, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    async fn new_design(&self, title: &str) -> String {
        self.run(&["new", "--title", title]).await.unwrap().trim().to_string()
    }
}

// ─── Store commands ─────────────────────────────────────────────────────

#[tokio::test]
async fn new_then_list_and_show() {
    let h = Harness::new();
    let id = h.new_design("Jazz Night").await;
    assert!(id.starts_with("design-"));

    let listed = h.run(&["list"]).await.unwrap();
    assert!(listed.contains(&id));
    assert!(listed.contains("Jazz Night"));
    assert!(listed.contains("0 elements"));

    let shown = h.run(&["show", &id]).await.unwrap();
    assert!(shown.starts_with(&format!("Jazz Night ({id})")));
    assert!(shown.contains("size: 800x1200"));
}

#[tokio::test]
async fn list_filters_and_sorts() {
    let h = Harness::new();
    h.new_design("beta launch").await;
    h.new_design("Alpha Sale").await;
    h.new_design("Gamma").await;

    let listed = h.run(&["list", "--sort", "name"]).await.unwrap();
    let titles: Vec<&str> = listed
        .lines()
        .map(|line| line.split("  ").nth(1).unwrap())
        .collect();
    assert_eq!(titles, vec!["Alpha Sale", "beta launch", "Gamma"]);

    let listed = h.run(&["list", "--search", "SALE"]).await.unwrap();
    assert_eq!(listed.lines().count(), 1);
    assert_eq!(h.run(&["list", "--search", "nothing"]).await.unwrap(), "No designs found.\n");
}

#[tokio::test]
async fn add_elements_and_show_layers() {
    let h = Harness::new();
    let id = h.new_design("Menu").await;
    h.run(&["add", &id, "shape"]).await.unwrap();
    h.run(&["add", &id, "text", "--text", "Today's Specials"]).await.unwrap();

    let record = h.store.get(&id).unwrap().unwrap();
    assert_eq!(record.elements.len(), 2);
    assert!(record.thumbnail.starts_with("data:image/png;base64,"));

    let shown = h.run(&["show", &id]).await.unwrap();
    let layers: Vec<&str> = shown.lines().skip_while(|l| !l.starts_with("layers")).skip(1).collect();
    assert_eq!(layers.len(), 2);
    assert!(layers[0].contains("Today's Specials"));
    assert!(layers[1].contains("Rectangle"));

    assert!(h.run(&["add", &id, "shape", "--text", "nope"]).await.is_err());
    assert!(h.run(&["add", "design-missing", "shape"]).await.is_err());
}

#[tokio::test]
async fn duplicate_and_delete() {
    let h = Harness::new();
    let id = h.new_design("Flyer").await;

    let out = h.run(&["duplicate", &id]).await.unwrap();
    assert!(out.contains("Flyer (副本)"));
    assert_eq!(h.store.list().unwrap().len(), 2);

    h.run(&["delete", &id]).await.unwrap();
    assert_eq!(h.store.list().unwrap().len(), 1);
    assert!(h.run(&["delete", &id]).await.is_err());
    assert!(h.run(&["duplicate", &id]).await.is_err());
}

#[tokio::test]
async fn export_writes_png_named_after_title() {
    let h = Harness::new();
    let id = h.new_design("Open House").await;
    h.run(&["add", &id, "shape"]).await.unwrap();

    let out_dir = h.dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let printed = h
        .run(&["export", &id, "--out", out_dir.to_str().unwrap()])
        .await
        .unwrap();

    let expected = out_dir.join("Open House.png");
    assert_eq!(printed.trim(), expected.display().to_string());
    let bytes = std::fs::read(expected).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

// ─── Generation ─────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_prints_url_without_design() {
    let h = Harness::new();
    let out = h.run(&["generate", "a paper crane", "-a", "9:16"]).await.unwrap();
    assert_eq!(out, format!("{GENERATED_URL}\n"));
}

#[tokio::test]
async fn generate_places_image_on_design() {
    let h = Harness::new();
    let id = h.new_design("Origami").await;
    h.run(&["generate", "a paper crane", "--design", &id]).await.unwrap();

    let record = h.store.get(&id).unwrap().unwrap();
    assert_eq!(record.elements.len(), 1);
    let el = &record.elements[0];
    assert_eq!((el.frame.x, el.frame.y, el.frame.width, el.frame.height), (200.0, 400.0, 400.0, 400.0));
    assert_eq!(
        el.kind,
        pd_core::ElementKind::Image(pd_core::ImageContent {
            src: GENERATED_URL.to_string()
        })
    );
}

#[tokio::test]
async fn generate_checks_design_and_prompt_first() {
    let h = Harness::new();
    assert!(h.run(&["generate", "a crane", "--design", "design-missing"]).await.is_err());
    assert_eq!(h.gateway.calls.load(Ordering::SeqCst), 0);

    let err = h.run(&["generate", "   "]).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<GenerateError>(), Some(GenerateError::EmptyPrompt)));
}
