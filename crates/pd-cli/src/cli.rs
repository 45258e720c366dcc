use clap::{Parser, Subcommand, ValueEnum};
use pd_ai::AspectRatio;
use pd_core::design::DEFAULT_TITLE;
use pd_core::{CanvasSize, ElementType};
use pd_store::SortOrder;
use std::path::PathBuf;

/// Poster Draft - design store, renderer and AI image generation
#[derive(Debug, Parser)]
#[command(name = "posterdraft", version)]
pub struct Cli {
    /// Design store file
    #[arg(long, global = true, env = "POSTERDRAFT_STORE", default_value = "designs.json")]
    pub store: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored designs
    List {
        /// Case-insensitive title filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// recent, oldest or name
        #[arg(long, default_value_t = SortOrder::Recent)]
        sort: SortOrder,
    },

    /// Show a design and its layers
    Show { id: String },

    /// Create an empty design
    New {
        #[arg(short, long, default_value = DEFAULT_TITLE)]
        title: String,

        /// Canvas size as WIDTHxHEIGHT
        #[arg(long, default_value_t = CanvasSize::POSTER)]
        size: CanvasSize,
    },

    /// Add an element to a design and save it
    Add {
        id: String,

        #[arg(value_enum)]
        kind: NewElement,

        /// Text content (text elements)
        #[arg(long)]
        text: Option<String>,

        /// Image reference (image elements)
        #[arg(long)]
        src: Option<String>,
    },

    /// Render a design to `<title>.png`
    Export {
        id: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Copy a design under a new id
    Duplicate { id: String },

    /// Delete a design
    Delete { id: String },

    /// Generate an image from a prompt
    Generate {
        prompt: String,

        /// 1:1, 16:9, 9:16 or 4:3
        #[arg(short, long, default_value_t = AspectRatio::Square)]
        aspect_ratio: AspectRatio,

        /// Place the image on this design and save it
        #[arg(short, long)]
        design: Option<String>,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::List { .. } => "list",
            Command::Show { .. } => "show",
            Command::New { .. } => "new",
            Command::Add { .. } => "add",
            Command::Export { .. } => "export",
            Command::Duplicate { .. } => "duplicate",
            Command::Delete { .. } => "delete",
            Command::Generate { .. } => "generate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NewElement {
    Text,
    Image,
    Shape,
}

impl From<NewElement> for ElementType {
    fn from(kind: NewElement) -> Self {
        match kind {
            NewElement::Text => ElementType::Text,
            NewElement::Image => ElementType::Image,
            NewElement::Shape => ElementType::Shape,
        }
    }
}
