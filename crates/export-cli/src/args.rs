use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use scene_builder::Quality;
use scene_export::{ExportFormat, OverwriteMode};

#[derive(Debug, Parser)]
#[command(name = "cad-scene-export")]
#[command(about = "Export a CAD document to glTF, GLB and Wavefront OBJ")]
#[command(version)]
pub struct Cli {
    /// Document description (JSON)
    pub document: PathBuf,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Directory to write into
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Base file name, without extension [default: document title]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Output format; repeat for several [default: all]
    #[arg(short = 'f', long = "format", value_name = "gltf|glb|obj")]
    pub formats: Vec<ExportFormat>,

    /// Tessellation quality
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,

    /// Vertex weld tolerance (L1, model units)
    #[arg(long, value_name = "EPS")]
    pub weld_epsilon: Option<f32>,

    /// What to do when an output file already exists
    #[arg(long, value_enum)]
    pub overwrite: Option<OverwriteArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Standard,
    Improved,
}

impl From<QualityArg> for Quality {
    fn from(q: QualityArg) -> Self {
        match q {
            QualityArg::Standard => Quality::Standard,
            QualityArg::Improved => Quality::Improved,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverwriteArg {
    Ask,
    Always,
    Never,
}

impl From<OverwriteArg> for OverwriteMode {
    fn from(o: OverwriteArg) -> Self {
        match o {
            OverwriteArg::Ask => OverwriteMode::Ask,
            OverwriteArg::Always => OverwriteMode::Always,
            OverwriteArg::Never => OverwriteMode::Never,
        }
    }
}
