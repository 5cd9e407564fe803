//! [`Choreographer`] – the gesture interpreter.
//!
//! Walks the steps of a [`GestureDefinition`] in order and dispatches each
//! through the [`CapabilityGuard`]:
//!
//! - A **non-blocking** step is fire-and-forget: the dispatch commands the
//!   channel and returns immediately, so consecutive non-blocking steps on
//!   different channels overlap in time. This is how simultaneous arm +
//!   head + antenna motion is achieved.
//! - A **blocking** step is a barrier: the whole sequence suspends until
//!   the step's motion completes. Everything dispatched before the barrier
//!   is issued before anything after it.
//! - A step's **hold** delay suspends the sequence after the dispatch
//!   regardless of the blocking flag; it models presentation pacing, not
//!   motion completion.
//!
//! Within one channel, dispatch order equals step order. Steps addressed to
//! absent channels contribute no delay and never affect sibling channels.
//!
//! A run never fails: absent channels and dispatch faults are tallied into
//! the returned [`GestureReport`] and the full declared sequence is walked
//! best-effort. The only early exit is cancellation via the abort flag,
//! which is observed between steps and at every suspension point.

use choreo_hal::{CapabilityGuard, ChannelRegistry};
use choreo_types::{GestureDefinition, GestureReport};
use tokio::sync::watch;
use tracing::{debug, info};

/// Create the abort flag pair used to cancel in-flight runs.
///
/// Flip the sender to `true` (e.g. from a Ctrl-C handler) to make every
/// borrowing [`Choreographer::run`] stop at its next cancellation point.
pub fn abort_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// The scheduler that executes gesture step tables against a populated
/// [`ChannelRegistry`]. Single-threaded control logic; concurrency comes
/// from non-blocking dispatches not waiting on one another.
pub struct Choreographer<'a> {
    registry: &'a ChannelRegistry,
    guard: CapabilityGuard,
}

impl<'a> Choreographer<'a> {
    pub fn new(registry: &'a ChannelRegistry) -> Self {
        Self {
            registry,
            guard: CapabilityGuard::new(),
        }
    }

    /// Execute `gesture` to completion, best-effort.
    ///
    /// An empty gesture completes immediately with an all-zero report and
    /// no suspension.
    pub async fn run(
        &self,
        gesture: &GestureDefinition,
        cancel: &mut watch::Receiver<bool>,
    ) -> GestureReport {
        let mut report = GestureReport::default();
        info!(gesture = %gesture.name, steps = gesture.len(), "running gesture");

        for step in &gesture.steps {
            if *cancel.borrow() {
                report.aborted = true;
                break;
            }

            let handle = self.registry.resolve(&step.channel);

            if step.blocking {
                // Barrier: suspend the whole sequence until the motion
                // completes or the run is cancelled.
                tokio::select! {
                    outcome = self.guard.dispatch(&handle, step) => report.record(&outcome),
                    _ = aborted(cancel) => {
                        report.aborted = true;
                        break;
                    }
                }
            } else {
                // Fire-and-forget: the dispatch returns once the channel
                // has been commanded.
                let outcome = self.guard.dispatch(&handle, step).await;
                report.record(&outcome);
            }

            if let Some(hold) = step.hold {
                tokio::select! {
                    _ = tokio::time::sleep(hold) => {}
                    _ = aborted(cancel) => {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        debug!(
            gesture = %gesture.name,
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failed,
            aborted = report.aborted,
            "gesture finished"
        );
        report
    }
}

/// Resolves when the abort flag becomes `true`. Never resolves when the
/// sender side is gone (no abort can arrive anymore).
async fn aborted(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|flag| *flag).await.is_err() {
        std::future::pending::<()>().await;
    }
}
