//! [`CapabilityGuard`] – the degrading dispatch wrapper.
//!
//! Every step the choreographer issues passes through
//! [`CapabilityGuard::dispatch`]. The guard turns the three ways a dispatch
//! can go wrong into a tri-state [`Outcome`] instead of an error:
//!
//! | Condition | Outcome |
//! |---|---|
//! | channel absent, or lacks the required capability | `Skipped` |
//! | underlying actuation call fails | `Failed(reason)` |
//! | call succeeds | `Applied` |
//!
//! One missing or misbehaving limb must never abort a gesture that partly
//! depends on other limbs, so nothing here propagates to the caller as an
//! error. `Failed` outcomes are logged and otherwise treated like `Skipped`.

use choreo_types::{Outcome, Step, Target};
use tracing::{debug, warn};

use crate::registry::ChannelHandle;

/// Wraps every dispatch to a channel so absence and runtime faults degrade
/// to no-ops.
#[derive(Default)]
pub struct CapabilityGuard;

impl CapabilityGuard {
    pub fn new() -> Self {
        Self
    }

    /// Dispatch one step through its resolved handle.
    ///
    /// When `step.blocking` is set the returned future completes only after
    /// the motion does; otherwise it completes as soon as the channel has
    /// been commanded.
    pub async fn dispatch(&self, handle: &ChannelHandle, step: &Step) -> Outcome {
        match handle {
            ChannelHandle::Absent => {
                debug!(channel = %step.channel, "channel absent, skipping step");
                Outcome::Skipped
            }

            ChannelHandle::Session(session) => match &step.target {
                Target::Posture(name) => {
                    match session.goto_posture(name, step.duration, step.blocking).await {
                        Ok(()) => Outcome::Applied,
                        Err(e) => {
                            warn!(posture = %name, error = %e, "posture dispatch failed");
                            Outcome::Failed(e.to_string())
                        }
                    }
                }
                other => {
                    debug!(target = ?other, "non-posture target on body channel, skipping");
                    Outcome::Skipped
                }
            },

            ChannelHandle::Present(channel) => {
                let Some(required) = step.target.required_capability() else {
                    // Posture targets only make sense on the body channel.
                    debug!(channel = %step.channel, "posture target on physical channel, skipping");
                    return Outcome::Skipped;
                };
                if !channel.capabilities().contains(&required) {
                    debug!(
                        channel = %step.channel,
                        capability = ?required,
                        "channel lacks capability, skipping step"
                    );
                    return Outcome::Skipped;
                }

                let result = match &step.target {
                    Target::Joints(pose) => {
                        channel.goto_joints(pose, step.duration, step.blocking).await
                    }
                    Target::LookAt { x, y, z } => channel.look_at(*x, *y, *z).await,
                    Target::RotateBy { axis, degrees } => {
                        channel
                            .rotate_by(*axis, *degrees, step.duration, step.blocking)
                            .await
                    }
                    // Filtered out by required_capability above.
                    Target::Posture(_) => return Outcome::Skipped,
                };

                match result {
                    Ok(()) => Outcome::Applied,
                    Err(e) => {
                        warn!(channel = %step.channel, error = %e, "dispatch failed, continuing");
                        Outcome::Failed(e.to_string())
                    }
                }
            }
        }
    }
}
