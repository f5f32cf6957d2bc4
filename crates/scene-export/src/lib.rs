//! Scene export: glTF, GLB and Wavefront OBJ writers, the export pipeline,
//! and a background worker that runs it off the caller's thread.

pub mod errors;
pub mod export;
pub mod format;
pub mod glb;
pub mod gltf;
pub mod obj;
pub mod options;
pub mod pipeline;
pub mod sink;
pub mod worker;

pub use errors::{ExportError, FormatError, PipelineError};
pub use export::{encode, export, output_path, ExportReport, FormatFailure, SceneExporter, WrittenFile};
pub use format::ExportFormat;
pub use glb::to_glb;
pub use gltf::to_gltf;
pub use obj::{to_obj, write_obj};
pub use options::ExportOptions;
pub use pipeline::{run_export, run_export_with_sink, ExportSummary};
pub use sink::{AlwaysOverwrite, ConfirmOverwrite, FsSink, NeverOverwrite, OutputSink, OverwriteMode};
pub use worker::{ExportWorker, WorkerEvent};
