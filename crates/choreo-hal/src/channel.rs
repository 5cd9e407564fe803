//! Generic [`ActuatorChannel`] trait for independently addressable actuator
//! groups.
//!
//! Drivers implement this trait for each group the robot physically exposes
//! (head, arms, antennas). The engine only ever talks to the trait through
//! the [`ChannelRegistry`][crate::registry::ChannelRegistry], so a robot
//! configuration that lacks a group simply never registers it.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use choreo_types::{ChannelCapability, ChoreoError, RotationAxis};

/// One independently addressable actuator group.
///
/// Commands taking a `wait` flag return immediately after commanding the
/// channel when `wait` is `false`, and only after the motion completes (or
/// `duration` elapses, whichever the driver defines as done) when `wait` is
/// `true`.
#[async_trait]
pub trait ActuatorChannel: Send + Sync {
    /// Stable logical name, e.g. `"head"` or `"r_arm"`.
    fn name(&self) -> &str;

    /// The actions this channel supports. A command the channel does not
    /// support is skipped upstream, never dispatched.
    fn capabilities(&self) -> HashSet<ChannelCapability>;

    /// Move to an absolute joint-space pose (degrees, channel joint order).
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::ChannelFault`] when the command cannot be
    /// applied (servo fault, target out of range, link lost mid-motion).
    async fn goto_joints(
        &self,
        pose: &[f32],
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError>;

    /// Orient toward a task-space point (metres, robot frame).
    async fn look_at(&self, x: f32, y: f32, z: f32) -> Result<(), ChoreoError>;

    /// Rotate by a relative angle around one axis.
    async fn rotate_by(
        &self,
        axis: RotationAxis,
        degrees: f32,
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError>;
}
