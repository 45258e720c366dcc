pub mod commands;
pub mod editor;
pub mod error;
pub mod history;
pub mod input;
pub mod layers;
pub mod properties;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use commands::{Alignment, EditorCommand};
pub use editor::{DragCommit, Editor, EditorConfig};
pub use error::{EditorError, SessionError};
pub use history::History;
pub use input::InputEvent;
pub use layers::{LayerDirection, LayerEntry, layer_list};
pub use properties::PropertyChange;
pub use session::{DesignSession, ExportedDesign, SaveMode, SessionConfig, spawn_autosave};
