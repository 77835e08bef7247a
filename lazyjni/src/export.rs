use std::{
    io,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TryRecvError},
};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    jni::{
        io::{serialize_with, write_atomically},
        resolve::{group_by_logical_key, resolve_external_names, SignatureCollisionError},
        types::{DescriptorError, MethodDescriptor},
    },
    types::{ExportEvent, Stage, StageProgress},
};

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Indented JSON instead of a single line.
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// What a successful export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub destination: PathBuf,
    pub entries: usize,
    /// Number of entries written with a long-form symbol.
    pub overloaded: usize,
    /// Hex MD5 of the written payload.
    pub digest: String,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Collision(#[from] SignatureCollisionError),
    #[error("Native method {method} has an invalid signature: {source}")]
    InvalidMethod {
        method: Box<MethodDescriptor>,
        #[source]
        source: DescriptorError,
    },
    #[error("Failed to encode signature map: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Export worker exited without a result")]
    WorkerLost,
}

pub fn export_signatures<I>(
    methods: I,
    destination: impl AsRef<Path>,
) -> Result<ExportReport, ExportError>
where
    I: IntoIterator<Item = MethodDescriptor>,
{
    export_signatures_with(methods, destination, &ExportOptions::default(), |_| {})
}

/// Resolves `methods` and writes the signature map to `destination`.
///
/// Nothing is written unless resolution succeeds, and the destination is
/// replaced in a single rename.
pub fn export_signatures_with<I>(
    methods: I,
    destination: impl AsRef<Path>,
    options: &ExportOptions,
    mut report_progress: impl FnMut(ExportEvent),
) -> Result<ExportReport, ExportError>
where
    I: IntoIterator<Item = MethodDescriptor>,
{
    let destination = destination.as_ref();

    report_progress(Stage::ResolvingSignatures.into());
    let groups = group_by_logical_key(methods);
    info!(
        "Grouped {} native methods into {} logical methods ({} overloads)",
        groups.method_count(),
        groups.len(),
        groups.overloaded_count()
    );
    for method in groups.iter().flat_map(|(_, members)| members) {
        method
            .validate()
            .map_err(|source| ExportError::InvalidMethod {
                method: Box::new(method.clone()),
                source,
            })?;
    }
    let map = resolve_external_names(&groups).inspect_err(|err| {
        warn!("Not writing {}: {}", destination.display(), err);
    })?;
    report_progress(ExportEvent {
        stage: Stage::ResolvingSignatures,
        progress: StageProgress::Done,
    });

    report_progress(Stage::WritingSignatures.into());
    let payload = serialize_with(&map, options.pretty)?;
    write_atomically(destination, &payload).map_err(|source| ExportError::Write {
        path: destination.to_path_buf(),
        source,
    })?;
    report_progress(ExportEvent {
        stage: Stage::WritingSignatures,
        progress: StageProgress::Done,
    });

    let report = ExportReport {
        destination: destination.to_path_buf(),
        entries: map.len(),
        overloaded: groups.overloaded_count(),
        digest: format!("{:x}", md5::compute(&payload)),
    };
    info!(
        "Wrote {} signatures to {} (md5 {})",
        report.entries,
        report.destination.display(),
        report.digest
    );
    Ok(report)
}

/// Export running on a background thread.
pub struct ExportHandle {
    events: Receiver<ExportEvent>,
    outcome: Receiver<Result<ExportReport, ExportError>>,
}

impl ExportHandle {
    /// Progress events reported so far.
    pub fn events(&self) -> impl Iterator<Item = ExportEvent> + '_ {
        self.events.try_iter()
    }

    /// `None` while the export is still running.
    pub fn try_outcome(&self) -> Option<Result<ExportReport, ExportError>> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ExportError::WorkerLost)),
        }
    }

    pub fn wait(self) -> Result<ExportReport, ExportError> {
        self.outcome.recv().unwrap_or(Err(ExportError::WorkerLost))
    }
}

pub fn spawn_export(
    methods: Vec<MethodDescriptor>,
    destination: PathBuf,
    options: ExportOptions,
) -> ExportHandle {
    let (event_tx, events) = mpsc::channel();
    let (outcome_tx, outcome) = mpsc::channel();

    std::thread::spawn(move || {
        let result = export_signatures_with(methods, &destination, &options, |evt| {
            let _ = event_tx.send(evt);
        });
        let _ = outcome_tx.send(result);
    });

    ExportHandle { events, outcome }
}
