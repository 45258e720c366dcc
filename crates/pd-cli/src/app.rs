//! Command execution against a store, an image resolver and an image
//! gateway. Output goes to any writer so runs can be captured.

use crate::cli::{Cli, Command, NewElement};
use anyhow::{Context, Result, bail};
use pd_ai::{AspectRatio, GenerateRequest, ImageGateway, OpenRouterGateway};
use pd_core::{CanvasSize, DesignRecord, ElementType};
use pd_editor::{DesignSession, EditorCommand, PropertyChange, SaveMode, SessionConfig, layer_list};
use pd_render::{DefaultResolver, ImageResolver};
use pd_store::{DesignQuery, DesignStore, JsonFileStore, SortOrder};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub struct App {
    store: Arc<dyn DesignStore>,
    resolver: Arc<dyn ImageResolver>,
    gateway: Arc<dyn ImageGateway>,
    config: SessionConfig,
}

impl App {
    pub fn new(store: Arc<dyn DesignStore>, resolver: Arc<dyn ImageResolver>, gateway: Arc<dyn ImageGateway>) -> Self {
        Self {
            store,
            resolver,
            gateway,
            config: SessionConfig::default(),
        }
    }

    /// JSON file store at `--store`, local image paths resolved next to it,
    /// and the OpenRouter gateway configured from the environment.
    pub fn from_cli(cli: &Cli) -> Self {
        let resolver = match cli.store.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            Some(dir) => DefaultResolver::with_base_dir(dir),
            None => DefaultResolver::new(),
        };
        Self::new(
            Arc::new(JsonFileStore::new(&cli.store)),
            Arc::new(resolver),
            Arc::new(OpenRouterGateway::from_env()),
        )
    }

    pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        log::debug!("running `{}`", command.name());
        match command {
            Command::List { search, sort } => self.list(&search, sort, out),
            Command::Show { id } => self.show(&id, out),
            Command::New { title, size } => self.create(title, size, out).await,
            Command::Add { id, kind, text, src } => self.add(&id, kind, text, src, out).await,
            Command::Export { id, out: dir } => self.export(&id, &dir, out).await,
            Command::Duplicate { id } => self.duplicate(&id, out),
            Command::Delete { id } => self.delete(&id, out),
            Command::Generate {
                prompt,
                aspect_ratio,
                design,
            } => self.generate(prompt, aspect_ratio, design.as_deref(), out).await,
        }
    }

    // ─── Store ───────────────────────────────────────────────────────────

    fn list(&self, search: &str, sort: SortOrder, out: &mut impl Write) -> Result<()> {
        let records = self.store.list().context("failed to read designs")?;
        let matching = DesignQuery::new(search, sort).apply(&records);
        if matching.is_empty() {
            writeln!(out, "No designs found.")?;
            return Ok(());
        }
        for record in matching {
            writeln!(
                out,
                "{}  {}  {} elements  {}",
                record.id,
                record.title,
                record.elements.len(),
                record.updated_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        Ok(())
    }

    fn show(&self, id: &str, out: &mut impl Write) -> Result<()> {
        let record = self.record(id)?;
        writeln!(out, "{} ({})", record.title, record.id)?;
        writeln!(out, "size: {}  category: {}", record.size, record.category)?;
        writeln!(
            out,
            "created: {}  updated: {}",
            record.created_at.to_rfc3339(),
            record.updated_at.to_rfc3339()
        )?;
        writeln!(out, "layers (top first):")?;
        for entry in layer_list(&record.elements) {
            writeln!(out, "  {:<6} {}  {}", entry.element_type.to_string(), entry.label, entry.id)?;
        }
        Ok(())
    }

    fn duplicate(&self, id: &str, out: &mut impl Write) -> Result<()> {
        let Some(copy) = self.store.duplicate(id)? else {
            bail!("design {id} not found");
        };
        writeln!(out, "{}  {}", copy.id, copy.title)?;
        Ok(())
    }

    fn delete(&self, id: &str, out: &mut impl Write) -> Result<()> {
        if !self.store.delete(id)? {
            bail!("design {id} not found");
        }
        writeln!(out, "deleted {id}")?;
        Ok(())
    }

    fn record(&self, id: &str) -> Result<DesignRecord> {
        self.store
            .get(id)
            .context("failed to read designs")?
            .with_context(|| format!("design {id} not found"))
    }

    // ─── Sessions ────────────────────────────────────────────────────────

    fn open(&self, id: &str) -> Result<DesignSession> {
        DesignSession::open(self.store.clone(), self.resolver.clone(), id, self.config.clone())
            .with_context(|| format!("failed to open design {id}"))
    }

    async fn create(&self, title: String, size: CanvasSize, out: &mut impl Write) -> Result<()> {
        let mut session = DesignSession::new(self.store.clone(), self.resolver.clone(), size, self.config.clone());
        session.set_title(title);
        session.save(SaveMode::Manual).await?;
        writeln!(out, "{}", session.id())?;
        Ok(())
    }

    async fn add(
        &self,
        id: &str,
        kind: NewElement,
        text: Option<String>,
        src: Option<String>,
        out: &mut impl Write,
    ) -> Result<()> {
        let element_type = ElementType::from(kind);
        let change = match (element_type, text, src) {
            (ElementType::Text, text, None) => text.map(PropertyChange::Text),
            (ElementType::Image, None, src) => src.map(PropertyChange::Src),
            (ElementType::Shape, None, None) => None,
            _ => bail!("--text applies to text elements and --src to image elements"),
        };

        let mut session = self.open(id)?;
        let editor = session.editor_mut();
        editor.dispatch(EditorCommand::Add(element_type))?;
        let element = editor.selected().context("added element was not selected")?;
        if let Some(change) = change {
            editor.dispatch(EditorCommand::Update { id: element, change })?;
        }
        session.save(SaveMode::Manual).await?;
        writeln!(out, "{element}")?;
        Ok(())
    }

    async fn export(&self, id: &str, dir: &Path, out: &mut impl Write) -> Result<()> {
        let session = self.open(id)?;
        let path = session.export_to(dir).await?;
        writeln!(out, "{}", path.display())?;
        Ok(())
    }

    // ─── Generation ──────────────────────────────────────────────────────

    async fn generate(
        &self,
        prompt: String,
        aspect_ratio: AspectRatio,
        design: Option<&str>,
        out: &mut impl Write,
    ) -> Result<()> {
        // A missing design should fail before paying for a generation
        let mut session = design.map(|id| self.open(id)).transpose()?;

        let request = GenerateRequest::new(prompt, aspect_ratio);
        let image = self.gateway.generate(&request).await?;

        match session.as_mut() {
            Some(session) => {
                let element = session.insert_generated_image(&image.image_url)?;
                session.save(SaveMode::Manual).await?;
                writeln!(out, "{element}  {}", image.image_url)?;
            }
            None => writeln!(out, "{}", image.image_url)?,
        }
        Ok(())
    }
}
