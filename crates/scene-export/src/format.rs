use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// glTF 2.0 JSON with an embedded base64 buffer.
    Gltf,
    /// Binary glTF container.
    Glb,
    /// Wavefront OBJ, geometry only.
    Obj,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Gltf, ExportFormat::Glb, ExportFormat::Obj];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Gltf => "gltf",
            ExportFormat::Glb => "glb",
            ExportFormat::Obj => "obj",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gltf" => Ok(ExportFormat::Gltf),
            "glb" => Ok(ExportFormat::Glb),
            "obj" => Ok(ExportFormat::Obj),
            other => Err(format!("unknown format '{other}' (expected gltf, glb or obj)")),
        }
    }
}

/// Remove repeats, keeping first occurrences in order.
pub fn dedup_formats(formats: &[ExportFormat]) -> Vec<ExportFormat> {
    let mut out: Vec<ExportFormat> = Vec::with_capacity(formats.len());
    for &f in formats {
        if !out.contains(&f) {
            out.push(f);
        }
    }
    out
}
