//! Background export on a dedicated thread.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use cad_host::CadDocument;
use scene_types::CancelToken;
use tracing::debug;

use crate::errors::PipelineError;
use crate::options::ExportOptions;
use crate::pipeline::{run_export, ExportSummary};
use crate::sink::ConfirmOverwrite;

pub const WORKER_THREAD_NAME: &str = "scene-export";

/// Messages from the worker thread, in order. `Finished` is always last.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Progress { percent: f32, message: String },
    Finished(Result<ExportSummary, PipelineError>),
}

/// Handle to an export running on its own thread.
pub struct ExportWorker {
    handle: JoinHandle<()>,
    events: Receiver<WorkerEvent>,
    cancel: CancelToken,
}

impl ExportWorker {
    /// Move `document` onto a new thread and start exporting it.
    pub fn spawn<D, C>(document: D, options: ExportOptions, confirm: C) -> std::io::Result<Self>
    where
        D: CadDocument + Send + 'static,
        C: ConfirmOverwrite + Send + 'static,
    {
        Self::spawn_with_cancel(document, options, confirm, CancelToken::new())
    }

    /// Like [`spawn`](Self::spawn), observing a token the caller already holds.
    pub fn spawn_with_cancel<D, C>(
        document: D,
        options: ExportOptions,
        mut confirm: C,
        cancel: CancelToken,
    ) -> std::io::Result<Self>
    where
        D: CadDocument + Send + 'static,
        C: ConfirmOverwrite + Send + 'static,
    {
        let (tx, events) = mpsc::channel();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || {
                let progress_tx = tx.clone();
                let mut on_progress = move |percent: f32, message: &str| {
                    // A dropped receiver just means nobody is listening.
                    let _ = progress_tx.send(WorkerEvent::Progress {
                        percent,
                        message: message.to_string(),
                    });
                };
                let result = run_export(&document, &options, &mut on_progress, &mut confirm, &token);
                debug!(ok = result.is_ok(), "worker finished");
                let _ = tx.send(WorkerEvent::Finished(result));
            })?;

        Ok(Self {
            handle,
            events,
            cancel,
        })
    }

    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Ask the run to stop before the next body.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Wait for the thread and return its result.
    ///
    /// Returns `None` if the `Finished` event was already taken through
    /// [`events`](Self::events) or the thread panicked.
    pub fn join(self) -> Option<Result<ExportSummary, PipelineError>> {
        let mut outcome = None;
        for event in self.events.iter() {
            if let WorkerEvent::Finished(result) = event {
                outcome = Some(result);
                break;
            }
        }
        self.handle.join().ok()?;
        outcome
    }
}
