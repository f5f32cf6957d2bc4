//! ExportScenario: fluent API for scripting export runs in tests.
//!
//! Drives the real assembler and pipeline against a mock host document and
//! records every progress update along the way.

use std::path::Path;

use cad_host::MockDocument;
use scene_builder::{AssembledScene, Quality, SceneAssembler};
use scene_export::{run_export, AlwaysOverwrite, ExportFormat, ExportOptions, ExportSummary};
use scene_types::{CancelToken, Progress};

use crate::assertions::assert_scene_valid;
use crate::helpers::*;

/// A document plus export options, run through assembly or the full pipeline.
pub struct ExportScenario {
    pub document: MockDocument,
    pub options: ExportOptions,
    progress: RecordedProgress,
    cancel: CancelToken,
    auto_check: bool,
}

impl ExportScenario {
    pub fn new(document: MockDocument) -> Self {
        Self {
            document,
            options: ExportOptions::default(),
            progress: RecordedProgress::default(),
            cancel: CancelToken::new(),
            auto_check: false,
        }
    }

    /// After every assembly, run all scene oracles and fail on any miss.
    pub fn with_auto_check(mut self) -> Self {
        self.auto_check = true;
        self
    }

    pub fn formats(mut self, formats: &[ExportFormat]) -> Self {
        self.options.formats = formats.to_vec();
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.options.quality = quality;
        self
    }

    pub fn weld_epsilon(mut self, eps: f32) -> Self {
        self.options.weld_epsilon = eps;
        self
    }

    pub fn base_name(mut self, name: &str) -> Self {
        self.options.base_name = Some(name.to_string());
        self
    }

    /// Token shared with the run; cancel it to stop before the next body.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn progress(&self) -> &RecordedProgress {
        &self.progress
    }

    // ── Runs ────────────────────────────────────────────────────────────

    /// Assemble the scene only.
    pub fn assemble(&mut self) -> Result<AssembledScene, HarnessError> {
        let mut assembler = SceneAssembler::new(self.options.assembly_options());
        let mut progress = Progress::new(&mut self.progress);
        let assembled = assembler.assemble(&self.document, &mut progress, &self.cancel)?;
        if self.auto_check {
            assert_scene_valid(&assembled.scene, self.options.weld_epsilon, "auto-check")?;
        }
        Ok(assembled)
    }

    /// Full pipeline into `dir`, overwriting existing files.
    pub fn export_into(&mut self, dir: &Path) -> Result<ExportSummary, HarnessError> {
        self.options.output_dir = dir.to_path_buf();
        let summary = run_export(
            &self.document,
            &self.options,
            &mut self.progress,
            &mut AlwaysOverwrite,
            &self.cancel,
        )?;
        Ok(summary)
    }
}
