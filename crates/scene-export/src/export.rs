//! Multi-format exporter with per-format failure isolation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use scene_types::{NoProgress, Progress, Scene};
use tracing::{info, instrument, warn};

use crate::errors::{ExportError, FormatError};
use crate::format::{dedup_formats, ExportFormat};
use crate::glb::to_glb;
use crate::gltf::to_gltf;
use crate::obj::to_obj;
use crate::sink::{ConfirmOverwrite, FsSink, OutputSink};

/// Progress fraction at which the export stage begins.
pub const EXPORT_START: f64 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    pub format: ExportFormat,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatFailure {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub error: FormatError,
}

/// Outcome of one export, per requested format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportReport {
    pub written: Vec<WrittenFile>,
    /// Formats whose existing file the user chose to keep.
    pub declined: Vec<(ExportFormat, PathBuf)>,
    pub failed: Vec<FormatFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.declined.is_empty() && self.failed.is_empty()
    }

    /// Formats that did not produce a file, declined or failed.
    pub fn skipped_formats(&self) -> Vec<ExportFormat> {
        self.declined
            .iter()
            .map(|(f, _)| *f)
            .chain(self.failed.iter().map(|f| f.format))
            .collect()
    }
}

/// `base_path` with `.ext` appended; any dot already in the name is kept.
pub fn output_path(base_path: &Path, format: ExportFormat) -> PathBuf {
    let mut s = OsString::from(base_path.as_os_str());
    s.push(".");
    s.push(format.extension());
    PathBuf::from(s)
}

/// Serialize a scene into one format's file contents.
pub fn encode(scene: &Scene, format: ExportFormat) -> Result<Vec<u8>, FormatError> {
    match format {
        ExportFormat::Gltf => to_gltf(scene),
        ExportFormat::Glb => to_glb(scene),
        ExportFormat::Obj => Ok(to_obj(scene).into_bytes()),
    }
}

/// Writes scenes through an [`OutputSink`].
pub struct SceneExporter<S: OutputSink = FsSink> {
    sink: S,
}

impl SceneExporter<FsSink> {
    pub fn to_filesystem() -> Self {
        Self::new(FsSink)
    }
}

impl<S: OutputSink> SceneExporter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Export `scene` to `base_path.<ext>` for every requested format.
    ///
    /// Only the checks in [`ExportError`] abort the run; anything that goes
    /// wrong with one format is recorded in the report and the next format
    /// is attempted.
    #[instrument(skip_all, fields(base = %base_path.display()))]
    pub fn export(
        &mut self,
        scene: &Scene,
        base_path: &Path,
        formats: &[ExportFormat],
        confirm: &mut dyn ConfirmOverwrite,
        progress: &mut Progress<'_>,
    ) -> Result<ExportReport, ExportError> {
        let formats = dedup_formats(formats);
        if formats.is_empty() {
            return Err(ExportError::NoFormats);
        }
        if base_path.file_name().map_or(true, |n| n.is_empty()) {
            return Err(ExportError::InvalidBasePath {
                path: base_path.display().to_string(),
            });
        }
        if scene.is_empty() {
            return Err(ExportError::EmptyScene);
        }

        let mut report = ExportReport::default();
        let step = (1.0 - EXPORT_START) / formats.len() as f64;
        for (i, format) in formats.into_iter().enumerate() {
            let path = output_path(base_path, format);
            progress.fraction(
                EXPORT_START + step * i as f64,
                &format!("Writing {}", path.display()),
            );

            if self.sink.exists(&path) && !confirm.confirm_overwrite(&path) {
                warn!(%format, path = %path.display(), "overwrite declined");
                report.declined.push((format, path));
                continue;
            }

            match encode(scene, format).and_then(|bytes| self.sink.write(&path, &bytes)) {
                Ok(()) => {
                    info!(%format, path = %path.display(), "file written");
                    report.written.push(WrittenFile { format, path });
                }
                Err(error) => {
                    warn!(%format, path = %path.display(), %error, "format failed");
                    report.failed.push(FormatFailure {
                        format,
                        path,
                        error,
                    });
                }
            }
        }
        Ok(report)
    }
}

/// One-shot export without progress reporting.
pub fn export(
    scene: &Scene,
    base_path: &Path,
    formats: &[ExportFormat],
    confirm: &mut dyn ConfirmOverwrite,
    sink: &mut dyn OutputSink,
) -> Result<ExportReport, ExportError> {
    let mut sink_progress = NoProgress;
    let mut progress = Progress::new(&mut sink_progress);
    SceneExporter::new(sink).export(scene, base_path, formats, confirm, &mut progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_extension() {
        let p = output_path(Path::new("out/model.v2"), ExportFormat::Glb);
        assert_eq!(p, PathBuf::from("out/model.v2.glb"));
    }

    #[test]
    fn report_lists_skipped_formats() {
        let report = ExportReport {
            written: vec![],
            declined: vec![(ExportFormat::Obj, PathBuf::from("a.obj"))],
            failed: vec![FormatFailure {
                format: ExportFormat::Glb,
                path: PathBuf::from("a.glb"),
                error: FormatError::Io {
                    reason: "disk full".into(),
                },
            }],
        };
        assert!(!report.is_complete());
        assert_eq!(
            report.skipped_formats(),
            vec![ExportFormat::Obj, ExportFormat::Glb]
        );
    }
}
