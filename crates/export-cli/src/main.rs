use anyhow::{anyhow, bail, Context};
use clap::Parser;
use export_cli::{load_document, resolve_config, Cli, CliConfirm};
use scene_export::{ExportWorker, WorkerEvent};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let document = load_document(&cli.document)?;
    info!(
        document = %cli.document.display(),
        output_dir = %config.export.output_dir.display(),
        overwrite = ?config.overwrite,
        "loaded document"
    );

    let confirm = CliConfirm::from_mode(config.overwrite);
    let worker = ExportWorker::spawn(document, config.export, confirm)
        .context("failed to start export thread")?;

    let mut outcome = None;
    for event in worker.events().iter() {
        match event {
            WorkerEvent::Progress { percent, message } => {
                eprintln!("[{percent:5.1}%] {message}");
            }
            WorkerEvent::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }
    worker.join();

    let summary = outcome.ok_or_else(|| anyhow!("export thread exited without a result"))??;
    for skipped in &summary.skipped_bodies {
        eprintln!("skipped body {}: {}", skipped.name, skipped.reason);
    }
    for (format, path) in &summary.report.declined {
        eprintln!("kept existing {format} file {}", path.display());
    }
    for failure in &summary.report.failed {
        eprintln!("{} export failed: {}", failure.format, failure.error);
    }
    for written in &summary.report.written {
        println!("{}", written.path.display());
    }

    if summary.report.written.is_empty() && !summary.report.failed.is_empty() {
        bail!("no files were written");
    }
    Ok(())
}
