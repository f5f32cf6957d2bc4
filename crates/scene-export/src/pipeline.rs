//! One export run: assemble the scene, then write every requested format.

use cad_host::CadDocument;
use scene_builder::{SceneAssembler, SkippedBody};
use scene_types::{CancelToken, Progress, ProgressSink};
use tracing::{info, instrument, warn};

use crate::errors::PipelineError;
use crate::export::{ExportReport, SceneExporter};
use crate::options::ExportOptions;
use crate::sink::{ConfirmOverwrite, FsSink, OutputSink};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub bodies_total: usize,
    pub bodies_exported: usize,
    pub skipped_bodies: Vec<SkippedBody>,
    pub report: ExportReport,
}

impl ExportSummary {
    /// Completion message shown as the final progress update.
    pub fn message(&self) -> String {
        let mut msg = format!(
            "Export complete: {} of {} bodies exported",
            self.bodies_exported, self.bodies_total
        );
        let skipped = self.report.skipped_formats();
        if !skipped.is_empty() {
            let names: Vec<String> = skipped.iter().map(|f| f.to_string()).collect();
            msg.push_str(&format!("; skipped formats: {}", names.join(", ")));
        }
        msg
    }
}

/// Run an export to the filesystem.
pub fn run_export(
    document: &dyn CadDocument,
    options: &ExportOptions,
    progress: &mut dyn ProgressSink,
    confirm: &mut dyn ConfirmOverwrite,
    cancel: &CancelToken,
) -> Result<ExportSummary, PipelineError> {
    run_export_with_sink(document, options, progress, confirm, cancel, FsSink)
}

/// Run an export through a custom sink. The last progress update is always
/// 100%, with either the completion or the failure message.
#[instrument(skip_all, fields(document = %document.title()))]
pub fn run_export_with_sink<S: OutputSink>(
    document: &dyn CadDocument,
    options: &ExportOptions,
    progress: &mut dyn ProgressSink,
    confirm: &mut dyn ConfirmOverwrite,
    cancel: &CancelToken,
    sink: S,
) -> Result<ExportSummary, PipelineError> {
    let mut progress = Progress::new(progress);
    info!(formats = ?options.formats, quality = ?options.quality, "export started");

    let result = run_stages(document, options, &mut progress, confirm, cancel, sink);
    match &result {
        Ok(summary) => {
            let message = summary.message();
            info!(
                written = summary.report.written.len(),
                failed = summary.report.failed.len(),
                "{message}"
            );
            progress.finish(&message);
        }
        Err(e) => {
            warn!(error = %e, "export failed");
            progress.finish(&format!("Export failed: {e}"));
        }
    }
    result
}

fn run_stages<S: OutputSink>(
    document: &dyn CadDocument,
    options: &ExportOptions,
    progress: &mut Progress<'_>,
    confirm: &mut dyn ConfirmOverwrite,
    cancel: &CancelToken,
    sink: S,
) -> Result<ExportSummary, PipelineError> {
    let mut assembler = SceneAssembler::new(options.assembly_options());
    let assembled = assembler.assemble(document, progress, cancel)?;

    let base_path = options.base_path(&document.title());
    let mut exporter = SceneExporter::new(sink);
    let report = exporter.export(
        &assembled.scene,
        &base_path,
        &options.formats,
        confirm,
        progress,
    )?;

    Ok(ExportSummary {
        bodies_total: assembled.bodies_total,
        bodies_exported: assembled.bodies_exported(),
        skipped_bodies: assembled.skipped,
        report,
    })
}
