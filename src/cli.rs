use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::connector::Marker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkerArg {
    Braille,
    HalfBlock,
    Block,
}

impl From<MarkerArg> for Marker {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Braille => Marker::Braille,
            MarkerArg::HalfBlock => Marker::HalfBlock,
            MarkerArg::Block => Marker::Block,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "twindiff",
    version,
    about = "Side-by-side diff viewer with synchronized scrolling"
)]
pub struct Cli {
    /// Original file (`-` reads stdin)
    pub original: PathBuf,

    /// Modified file (`-` reads stdin)
    pub modified: PathBuf,

    /// Grammar for syntax highlighting (detected from the modified path if omitted)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Color theme
    #[arg(long)]
    pub theme: Option<String>,

    /// Glyphs used to draw gutter connectors
    #[arg(long, value_enum)]
    pub marker: Option<MarkerArg>,

    /// Hide the connector gutter
    #[arg(long)]
    pub no_connectors: bool,

    /// Largest LCS table before switching to the linear-space diff
    #[arg(long = "max-cells")]
    pub max_cells: Option<usize>,

    /// Write logs here instead of ~/.cache/twindiff/twindiff.log
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
