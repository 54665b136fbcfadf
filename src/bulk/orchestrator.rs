use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    bulk::ops::{AssetInput, AssetOutput, BulkOperation, TransformSettings, transform_asset},
    foundation::{
        core::AssetKey,
        error::{ModkitError, ModkitResult},
    },
    registry::store::AssetRegistry,
    selection::tracker::{SelectionMode, SelectionTracker},
};

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Worker controls for the per-asset transform step.
pub struct BulkThreading {
    /// Run transforms on a rayon pool when `true`. Registry writes stay on the calling thread.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, Default)]
/// Cooperative cancellation flag checked between assets.
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
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

#[derive(Clone, Debug, PartialEq, Eq)]
/// Progress notifications emitted by [`BulkOrchestrator::run`], in asset order.
pub enum BulkEvent {
    /// One asset finished, successfully or not.
    Progress {
        processed: usize,
        total: usize,
        current: AssetKey,
        succeeded: bool,
    },
    /// The batch ended.
    Completed {
        succeeded: usize,
        failed: usize,
        cancelled: bool,
    },
}

#[derive(Debug)]
/// One asset the batch could not transform.
pub struct AssetFailure {
    pub key: AssetKey,
    pub error: ModkitError,
}

#[derive(Debug, Default)]
/// Outcome of one batch.
pub struct BatchReport {
    /// Operation name, see [`BulkOperation::name`].
    pub operation: &'static str,
    /// Assets written back to the registry, in order.
    pub succeeded: Vec<AssetKey>,
    /// Assets whose transform failed; the rest of the batch still ran.
    pub failures: Vec<AssetFailure>,
    /// Selected assets the operation does not apply to.
    pub skipped: Vec<AssetKey>,
    /// `true` when the cancel token stopped the batch early.
    pub cancelled: bool,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.failures.iter().map(|f| &f.key)
    }
}

/// Runs one [`BulkOperation`] over the current selection at a time.
#[derive(Debug, Default)]
pub struct BulkOrchestrator {
    running: AtomicBool,
    settings: TransformSettings,
    threading: BulkThreading,
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BulkOrchestrator {
    pub fn new(settings: TransformSettings, threading: BulkThreading) -> Self {
        Self {
            running: AtomicBool::new(false),
            settings,
            threading,
        }
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    /// `true` while a batch is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Apply `op` to every selected asset.
    ///
    /// Usage errors (another batch running, wrong selection mode, invalid parameters, undecodable
    /// replacement media) are returned before anything is mutated. Per-asset failures are logged,
    /// collected in the report, and do not stop the batch. A selected asset that has been excluded
    /// since is never edited; it is reported as a [`ModkitError::ConflictingState`] failure.
    ///
    /// A completed batch clears the selection; a cancelled one keeps it.
    #[tracing::instrument(skip_all, fields(op = op.name(), selected = selection.len()))]
    pub fn run(
        &self,
        registry: &mut AssetRegistry,
        selection: &mut SelectionTracker,
        op: &BulkOperation,
        cancel: &CancelToken,
        on_event: &mut dyn FnMut(&BulkEvent),
    ) -> ModkitResult<BatchReport> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ModkitError::OperationInProgress);
        }
        let _guard = RunningGuard(&self.running);

        if selection.mode() != op.required_mode() {
            return Err(ModkitError::conflicting_state(format!(
                "{} needs {:?} selection mode, tracker is in {:?}",
                op.name(),
                op.required_mode(),
                selection.mode()
            )));
        }
        let prepared = op.prepare(&self.settings)?;

        let mut report = BatchReport {
            operation: op.name(),
            ..BatchReport::default()
        };
        let mut inputs = Vec::with_capacity(selection.len());
        for key in selection.selected_keys() {
            let record = match registry.get(key) {
                Ok(r) => r,
                Err(e) => {
                    warn!(asset = %key, error = %e, "selected asset missing from registry");
                    report.failures.push(AssetFailure {
                        key: key.clone(),
                        error: e,
                    });
                    continue;
                }
            };
            if let Some(family) = op.family()
                && record.current_kind().family() != family
            {
                warn!(asset = %key, op = op.name(), "operation does not apply, skipping");
                report.skipped.push(key.clone());
                continue;
            }
            if op.required_mode() == SelectionMode::Edit && record.is_excluded() {
                let error = ModkitError::conflicting_state(format!(
                    "{key} was excluded after it was selected for editing"
                ));
                warn!(asset = %key, op = op.name(), "excluded asset left untouched");
                report.failures.push(AssetFailure {
                    key: key.clone(),
                    error,
                });
                continue;
            }
            inputs.push(AssetInput {
                key: key.clone(),
                bytes: record.current_bytes_arc(),
                kind: record.current_kind(),
                excluded: record.is_excluded(),
            });
        }

        let total = inputs.len();
        let mut apply = |processed: usize,
                         input: &AssetInput,
                         result: ModkitResult<AssetOutput>,
                         report: &mut BatchReport| {
            let outcome = result.and_then(|out| {
                registry.update_shared(&input.key, out.bytes, out.kind, out.excluded)
            });
            let succeeded = outcome.is_ok();
            match outcome {
                Ok(()) => report.succeeded.push(input.key.clone()),
                Err(e) => {
                    warn!(asset = %input.key, error = %e, "asset transform failed");
                    report.failures.push(AssetFailure {
                        key: input.key.clone(),
                        error: e,
                    });
                }
            }
            on_event(&BulkEvent::Progress {
                processed,
                total,
                current: input.key.clone(),
                succeeded,
            });
        };

        if self.threading.parallel && total > 1 {
            let pool = build_thread_pool(self.threading.threads)?;
            let settings = &self.settings;
            let results: Vec<Option<ModkitResult<AssetOutput>>> = pool.install(|| {
                inputs
                    .par_iter()
                    .map(|input| {
                        (!cancel.is_cancelled())
                            .then(|| transform_asset(&prepared, input, settings))
                    })
                    .collect()
            });
            for (i, (input, result)) in inputs.iter().zip(results).enumerate() {
                let Some(result) = result.filter(|_| !cancel.is_cancelled()) else {
                    report.cancelled = true;
                    break;
                };
                apply(i + 1, input, result, &mut report);
            }
        } else {
            for (i, input) in inputs.iter().enumerate() {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    break;
                }
                let result = transform_asset(&prepared, input, &self.settings);
                apply(i + 1, input, result, &mut report);
            }
        }

        if !report.cancelled {
            selection.clear();
        }
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            cancelled = report.cancelled,
            "bulk operation finished"
        );
        on_event(&BulkEvent::Completed {
            succeeded: report.succeeded.len(),
            failed: report.failures.len(),
            cancelled: report.cancelled,
        });
        Ok(report)
    }
}

fn build_thread_pool(threads: Option<usize>) -> ModkitResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ModkitError::config(
            "bulk threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ModkitError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/bulk/orchestrator.rs"]
mod tests;
