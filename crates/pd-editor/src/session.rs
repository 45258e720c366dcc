//! A design session: one editor bound to a record in a design store.
//!
//! Sessions are shared as `Arc<tokio::sync::Mutex<DesignSession>>`. Saving
//! takes `&mut self`, so the mutex serializes manual saves against the
//! autosave task and overlapping saves cannot interleave.

use crate::commands::EditorCommand;
use crate::editor::{Editor, EditorConfig};
use crate::error::SessionError;
use chrono::{DateTime, Utc};
use pd_core::design::{DEFAULT_CATEGORY, DEFAULT_TITLE, export_file_name};
use pd_core::id::new_design_id;
use pd_core::{CanvasSize, DesignRecord, ElementId};
use pd_render::{Exported, ImageResolver, THUMBNAIL_WIDTH, export_png, export_thumbnail};
use pd_store::DesignStore;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub autosave_interval: Duration,
    /// Maximum thumbnail width stored with each record.
    pub thumbnail_width: u32,
    pub editor: EditorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_interval: AUTOSAVE_INTERVAL,
            thumbnail_width: THUMBNAIL_WIDTH,
            editor: EditorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// User-requested; always writes.
    Manual,
    /// Timer-driven; skips empty or unchanged designs.
    Autosave,
}

/// A full-resolution export ready to be downloaded.
#[derive(Debug, Clone)]
pub struct ExportedDesign {
    /// `<title>.png`
    pub file_name: String,
    pub image: Exported,
}

pub struct DesignSession {
    id: String,
    title: String,
    category: String,
    editor: Editor,
    store: Arc<dyn DesignStore>,
    resolver: Arc<dyn ImageResolver>,
    config: SessionConfig,
    /// Editor revision and title as of the last successful save.
    saved: Option<(u64, String)>,
}

impl DesignSession {
    /// A new, unsaved design on a blank canvas.
    pub fn new(
        store: Arc<dyn DesignStore>,
        resolver: Arc<dyn ImageResolver>,
        canvas: CanvasSize,
        config: SessionConfig,
    ) -> Self {
        Self {
            id: new_design_id(),
            title: DEFAULT_TITLE.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            editor: Editor::new(canvas, config.editor.clone()),
            store,
            resolver,
            config,
            saved: None,
        }
    }

    /// Load a stored design with a fresh, empty history.
    pub fn open(
        store: Arc<dyn DesignStore>,
        resolver: Arc<dyn ImageResolver>,
        id: &str,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let record = store.get(id)?.ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        log::info!("opened design {} ({} elements)", record.id, record.elements.len());
        let editor = Editor::with_elements(record.size, record.elements, config.editor.clone());
        Ok(Self {
            saved: Some((editor.revision(), record.title.clone())),
            id: record.id,
            title: record.title,
            category: record.category,
            editor,
            store,
            resolver,
            config,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn canvas(&self) -> CanvasSize {
        self.editor.canvas()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Whether there are changes since the last save.
    pub fn is_dirty(&self) -> bool {
        match &self.saved {
            Some((revision, title)) => *revision != self.editor.revision() || *title != self.title,
            None => true,
        }
    }

    /// Append a generated image at its default placement and select it.
    pub fn insert_generated_image(&mut self, src: impl Into<String>) -> Result<ElementId, SessionError> {
        let el = self.editor.generated_image(src);
        let id = el.id;
        self.editor.dispatch(EditorCommand::Insert(el))?;
        Ok(id)
    }

    /// Render a thumbnail and upsert the design into the store.
    ///
    /// Returns the stored record, or `None` when an autosave was skipped.
    pub async fn save(&mut self, mode: SaveMode) -> Result<Option<DesignRecord>, SessionError> {
        if mode == SaveMode::Autosave && (self.editor.elements().is_empty() || !self.is_dirty()) {
            log::trace!("autosave skipped for {}", self.id);
            return Ok(None);
        }

        let revision = self.editor.revision();
        let thumbnail = export_thumbnail(
            self.editor.elements(),
            self.canvas(),
            self.resolver.as_ref(),
            self.config.thumbnail_width,
        )
        .await?;

        let now = Utc::now();
        let created_at: DateTime<Utc> = self.store.get(&self.id)?.map(|d| d.created_at).unwrap_or(now);
        let record = DesignRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            elements: self.editor.elements().to_vec(),
            thumbnail: thumbnail.data_uri(),
            created_at,
            updated_at: now,
            size: self.canvas(),
            category: self.category.clone(),
        };

        let stored = self.store.upsert(record)?;
        self.saved = Some((revision, self.title.clone()));
        log::info!(
            "{} design {} ({}, {} elements)",
            match mode {
                SaveMode::Manual => "saved",
                SaveMode::Autosave => "autosaved",
            },
            stored.id,
            stored.title,
            stored.elements.len()
        );
        Ok(Some(stored))
    }

    /// Rasterize at full canvas resolution.
    pub async fn export(&self) -> Result<ExportedDesign, SessionError> {
        let image = export_png(self.editor.elements(), self.canvas(), self.resolver.as_ref()).await?;
        let file_name = export_file_name(&self.title);
        log::info!("exported {file_name} ({}x{})", image.width, image.height);
        Ok(ExportedDesign { file_name, image })
    }

    /// Export and write `<title>.png` into `dir`. Returns the written path.
    pub async fn export_to(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        let exported = self.export().await?;
        let path = dir.join(&exported.file_name);
        tokio::fs::write(&path, &exported.image.png)
            .await
            .map_err(|source| SessionError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}

/// Autosave `session` every `every` until the session is dropped. The first
/// save happens one full interval after spawning. Failures are logged and
/// never stop the loop.
pub fn spawn_autosave(session: &Arc<Mutex<DesignSession>>, every: Duration) -> JoinHandle<()> {
    let weak: Weak<Mutex<DesignSession>> = Arc::downgrade(session);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(session) = weak.upgrade() else {
                break;
            };
            let mut session = session.lock().await;
            if let Err(e) = session.save(SaveMode::Autosave).await {
                log::warn!("autosave of {} failed: {e}", session.id());
            }
        }
    })
}
