use std::path::Path;

use anyhow::Context;
use cad_host::MockDocument;
use scene_export::{ExportOptions, OverwriteMode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::args::Cli;

/// Configuration file contents: export options plus the overwrite policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    #[serde(flatten)]
    pub export: ExportOptions,
    pub overwrite: OverwriteMode,
}

impl CliConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Overlay the flags that were given on the command line.
    pub fn merge(mut self, cli: &Cli) -> Self {
        if let Some(dir) = &cli.output_dir {
            self.export.output_dir = dir.clone();
        }
        if let Some(name) = &cli.name {
            self.export.base_name = Some(name.clone());
        }
        if !cli.formats.is_empty() {
            self.export.formats = cli.formats.clone();
        }
        if let Some(quality) = cli.quality {
            self.export.quality = quality.into();
        }
        if let Some(eps) = cli.weld_epsilon {
            self.export.weld_epsilon = eps;
        }
        if let Some(overwrite) = cli.overwrite {
            self.overwrite = overwrite.into();
        }
        self
    }
}

/// Defaults, then the config file if given, then flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let base = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            CliConfig::load(path)?
        }
        None => CliConfig::default(),
    };
    Ok(base.merge(cli))
}

pub fn load_document(path: &Path) -> anyhow::Result<MockDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    MockDocument::from_json(&json).with_context(|| format!("in {}", path.display()))
}
