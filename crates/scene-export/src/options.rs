use std::path::{Path, PathBuf};

use scene_builder::{AssemblyOptions, MaterialPolicy, Quality, DEFAULT_WELD_EPSILON};
use serde::{Deserialize, Serialize};

use crate::format::ExportFormat;

/// Base name used when neither an explicit name nor a usable title exists.
pub const FALLBACK_BASE_NAME: &str = "scene";

/// Settings for one export run. Every field has a default, so a partial
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    /// File name without extension; the document title when unset.
    pub base_name: Option<String>,
    pub formats: Vec<ExportFormat>,
    pub quality: Quality,
    pub weld_epsilon: f32,
    pub material_policy: MaterialPolicy,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            base_name: None,
            formats: ExportFormat::ALL.to_vec(),
            quality: Quality::Improved,
            weld_epsilon: DEFAULT_WELD_EPSILON,
            material_policy: MaterialPolicy::Extended,
        }
    }
}

impl ExportOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            quality: self.quality,
            weld_epsilon: self.weld_epsilon,
            material_policy: self.material_policy,
        }
    }

    /// `output_dir/base_name`, without extension.
    pub fn base_path(&self, document_title: &str) -> PathBuf {
        let name = match &self.base_name {
            Some(name) => name.clone(),
            None => base_name_from_title(document_title),
        };
        self.output_dir.join(name)
    }
}

/// Title with any directory and extension stripped, e.g. `Bracket.SLDPRT`
/// becomes `Bracket`.
pub fn base_name_from_title(title: &str) -> String {
    Path::new(title.trim())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| FALLBACK_BASE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_export_everything_at_improved_quality() {
        let opts = ExportOptions::default();
        assert_eq!(opts.formats, ExportFormat::ALL.to_vec());
        assert_eq!(opts.quality, Quality::Improved);
        assert_eq!(opts.weld_epsilon, 1e-5);
        assert_eq!(opts.output_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let opts = ExportOptions::from_json(r#"{"formats": ["obj"], "quality": "standard"}"#)
            .unwrap();
        assert_eq!(opts.formats, vec![ExportFormat::Obj]);
        assert_eq!(opts.quality, Quality::Standard);
        assert_eq!(opts.material_policy, MaterialPolicy::Extended);
        assert!(opts.base_name.is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(ExportOptions::from_json(r#"{"formats": ["stl"]}"#).is_err());
    }

    #[test]
    fn base_path_prefers_explicit_name() {
        let mut opts = ExportOptions {
            output_dir: PathBuf::from("out"),
            ..ExportOptions::default()
        };
        assert_eq!(opts.base_path("Bracket.SLDPRT"), PathBuf::from("out/Bracket"));
        opts.base_name = Some("final".into());
        assert_eq!(opts.base_path("Bracket.SLDPRT"), PathBuf::from("out/final"));
        assert_eq!(base_name_from_title("   "), FALLBACK_BASE_NAME);
    }
}
