//! [`RobotSession`] and [`RobotDriver`] – the connection boundary.
//!
//! A driver establishes one live session per robot; the session exposes the
//! session-wide operations (power state, whole-body postures) and the set of
//! channels the connected configuration actually has. Connection
//! establishment is the one fatal failure point in the system — everything
//! downstream degrades instead of erroring.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use choreo_types::ChoreoError;

use crate::channel::ActuatorChannel;

/// A live connection to one robot (physical or simulated).
///
/// Sessions are shared (`Arc`) between the connection supervisor, which owns
/// the lifecycle, and the channel registry, which only reads channels.
#[async_trait]
pub trait RobotSession: Send + Sync {
    /// Pure query; does not mutate session state.
    fn is_connected(&self) -> bool;

    /// Names of the channels this configuration physically exposes.
    fn channel_names(&self) -> Vec<String>;

    /// Look up one channel by name. `None` means the configuration lacks
    /// that group — a normal condition, not an error.
    fn channel(&self, name: &str) -> Option<Arc<dyn ActuatorChannel>>;

    /// Activate all motors.
    async fn power_on(&self) -> Result<(), ChoreoError>;

    /// Cut motor power immediately; limbs become passively movable.
    async fn power_off(&self) -> Result<(), ChoreoError>;

    /// Release motor power with bounded deceleration instead of an
    /// instantaneous cut.
    async fn power_off_smoothly(&self) -> Result<(), ChoreoError>;

    /// Move the whole body to a named posture (e.g. `"default"`,
    /// `"elbow_90"`). Same `wait` semantics as per-channel commands.
    async fn goto_posture(
        &self,
        name: &str,
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError>;

    /// Tear the session down. After this call [`is_connected`] returns
    /// `false` and channel handles stop accepting commands.
    ///
    /// [`is_connected`]: RobotSession::is_connected
    async fn close(&self) -> Result<(), ChoreoError>;
}

/// Connector that establishes [`RobotSession`]s.
#[async_trait]
pub trait RobotDriver: Send + Sync {
    /// Establish a session with the robot at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`ChoreoError::ConnectionFailed`] when no session can be
    /// established. The caller must not build a registry or run gestures
    /// after this error.
    async fn connect(&self, address: &str) -> Result<Arc<dyn RobotSession>, ChoreoError>;
}
