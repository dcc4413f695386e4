//! Batch driver with progress events and cooperative cancellation.

use crate::error::{BatchError, Result};
use crate::job::{process_file, JobSettings};
use crossbeam_channel::{Receiver, Sender};
use downshift_core::Downshifter;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Progress notifications, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEvent {
    /// File `index` (0-based) of `total` is about to be processed.
    Started {
        index: usize,
        total: usize,
        path: PathBuf,
    },
    Saved {
        path: PathBuf,
    },
    /// Processing `path` failed; the batch ends here.
    Failed {
        path: PathBuf,
        error: String,
    },
    /// Cancellation was seen before the next file.
    Stopped,
    /// Every file was written.
    Finished,
}

/// Shared stop flag, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What a batch left behind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Output files in processing order.
    pub written: Vec<PathBuf>,
    /// Whether the batch was stopped before the last file.
    pub stopped: bool,
}

/// Run a batch on the calling thread.
///
/// The first failing file aborts the batch: a [`BatchEvent::Failed`] is
/// emitted and its error returned. A file already in progress when `cancel`
/// fires is still completed.
pub fn run_batch<F>(
    shifter: &Downshifter,
    inputs: &[PathBuf],
    settings: &JobSettings,
    cancel: &CancellationToken,
    mut on_event: F,
) -> Result<BatchReport>
where
    F: FnMut(BatchEvent),
{
    settings.validate()?;

    let total = inputs.len();
    let mut report = BatchReport::default();

    for (index, input) in inputs.iter().enumerate() {
        if cancel.is_cancelled() {
            info!("Processing stopped by user");
            report.stopped = true;
            on_event(BatchEvent::Stopped);
            return Ok(report);
        }

        debug!("[{}/{}] Processing {}", index + 1, total, input.display());
        on_event(BatchEvent::Started {
            index,
            total,
            path: input.clone(),
        });

        match process_file(shifter, input, settings) {
            Ok(output) => {
                debug!("Saved to {}", output.display());
                on_event(BatchEvent::Saved {
                    path: output.clone(),
                });
                report.written.push(output);
            }
            Err(e) => {
                warn!("Failed to process {}: {}", input.display(), e);
                on_event(BatchEvent::Failed {
                    path: input.clone(),
                    error: e.to_string(),
                });
                return Err(e);
            }
        }
    }

    info!("All {} files finished", total);
    on_event(BatchEvent::Finished);
    Ok(report)
}

/// Handle to a batch running on a background thread.
/// Drain events with [`poll()`](Self::poll).
pub struct BatchHandle {
    events: Receiver<BatchEvent>,
    cancel: CancellationToken,
    thread: Option<JoinHandle<Result<BatchReport>>>,
}

impl BatchHandle {
    /// Start the batch with every backend compiled into this build.
    pub fn start(inputs: Vec<PathBuf>, settings: JobSettings) -> Result<Self> {
        Self::start_with(Arc::new(Downshifter::new()), inputs, settings)
    }

    pub fn start_with(
        shifter: Arc<Downshifter>,
        inputs: Vec<PathBuf>,
        settings: JobSettings,
    ) -> Result<Self> {
        let (tx, rx): (Sender<BatchEvent>, Receiver<BatchEvent>) = crossbeam_channel::unbounded();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let thread = std::thread::Builder::new()
            .name("downshift-batch".into())
            .spawn(move || {
                run_batch(&shifter, &inputs, &settings, &token, |event| {
                    // The handle may already be gone
                    let _ = tx.send(event);
                })
            })?;

        Ok(Self {
            events: rx,
            cancel,
            thread: Some(thread),
        })
    }

    /// Take every event received so far (non-blocking).
    pub fn poll(&self) -> Vec<BatchEvent> {
        self.events.try_iter().collect()
    }

    /// Ask the worker to stop before its next file.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_done(&self) -> bool {
        self.thread
            .as_ref()
            .map(|t| t.is_finished())
            .unwrap_or(true)
    }

    /// Block until the worker exits.
    pub fn wait(mut self) -> Result<BatchReport> {
        match self.thread.take() {
            Some(thread) => match thread.join() {
                Ok(result) => result,
                Err(_) => Err(BatchError::Worker("batch thread panicked".into())),
            },
            None => Err(BatchError::Worker("batch already consumed".into())),
        }
    }
}
