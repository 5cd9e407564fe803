use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reserved channel name for whole-body posture steps.
///
/// Posture commands (`Target::Posture`) are addressed to the session rather
/// than to a single actuator group, so the resolver treats this name
/// specially instead of looking it up among the physical channels.
pub const POSTURE_CHANNEL: &str = "body";

/// One action an actuator channel may support.
///
/// A channel advertises its capability set when the registry is built; a
/// channel that lacks the capability a step needs is treated the same as an
/// absent channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelCapability {
    /// Joint-space position moves (`Target::Joints`).
    JointMove,
    /// Task-space gaze targets (`Target::LookAt`).
    LookAt,
    /// Relative rotations around a single axis (`Target::RotateBy`).
    RotateBy,
}

/// Axis of a relative rotation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationAxis {
    Roll,
    Pitch,
    Yaw,
}

/// What a [`Step`] commands its channel to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Target {
    /// Absolute joint-space pose, ordered per the channel's joint layout,
    /// in degrees.
    Joints(Vec<f32>),
    /// Task-space gaze target in metres, robot frame.
    LookAt { x: f32, y: f32, z: f32 },
    /// Relative rotation around one axis, in degrees.
    RotateBy { axis: RotationAxis, degrees: f32 },
    /// Whole-body named posture (e.g. `"default"`, `"elbow_90"`).
    /// Addressed to [`POSTURE_CHANNEL`], not to a single channel.
    Posture(String),
}

impl Target {
    /// The capability a channel must hold to accept this target.
    ///
    /// `Posture` returns `None`: it is executed by the session itself and
    /// bypasses per-channel capability checks.
    pub fn required_capability(&self) -> Option<ChannelCapability> {
        match self {
            Target::Joints(_) => Some(ChannelCapability::JointMove),
            Target::LookAt { .. } => Some(ChannelCapability::LookAt),
            Target::RotateBy { .. } => Some(ChannelCapability::RotateBy),
            Target::Posture(_) => None,
        }
    }
}

/// One timed command addressed to one channel.
///
/// Steps are immutable values owned by the [`GestureDefinition`] that
/// contains them. `blocking` makes the step a barrier: the choreographer
/// suspends the whole sequence until the motion completes. `hold` is a
/// presentation-pacing delay that always suspends the sequence after the
/// dispatch, independent of `blocking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub channel: String,
    pub target: Target,
    pub duration: Duration,
    pub blocking: bool,
    pub hold: Option<Duration>,
}

impl Step {
    /// Non-blocking joint-space step. `secs` is the motion duration.
    pub fn joints(channel: &str, pose: impl Into<Vec<f32>>, secs: f32) -> Self {
        Self {
            channel: channel.to_string(),
            target: Target::Joints(pose.into()),
            duration: Duration::from_secs_f32(secs),
            blocking: false,
            hold: None,
        }
    }

    /// Non-blocking gaze step. Gaze commands have no meaningful motion
    /// duration of their own; the underlying interface resolves them.
    pub fn look_at(channel: &str, x: f32, y: f32, z: f32) -> Self {
        Self {
            channel: channel.to_string(),
            target: Target::LookAt { x, y, z },
            duration: Duration::ZERO,
            blocking: false,
            hold: None,
        }
    }

    /// Non-blocking relative-rotation step.
    pub fn rotate_by(channel: &str, axis: RotationAxis, degrees: f32, secs: f32) -> Self {
        Self {
            channel: channel.to_string(),
            target: Target::RotateBy { axis, degrees },
            duration: Duration::from_secs_f32(secs),
            blocking: false,
            hold: None,
        }
    }

    /// Non-blocking whole-body posture step, addressed to
    /// [`POSTURE_CHANNEL`].
    pub fn posture(name: &str, secs: f32) -> Self {
        Self {
            channel: POSTURE_CHANNEL.to_string(),
            target: Target::Posture(name.to_string()),
            duration: Duration::from_secs_f32(secs),
            blocking: false,
            hold: None,
        }
    }

    /// Mark the step as a barrier: the sequence waits for its motion to
    /// complete before the next step is dispatched.
    pub fn blocking(mut self) -> Self {
        self.blocking = true;
        self
    }

    /// Add a pacing delay after the dispatch. The delay suspends the whole
    /// sequence regardless of the blocking flag.
    pub fn hold(mut self, secs: f32) -> Self {
        self.hold = Some(Duration::from_secs_f32(secs));
        self
    }
}

/// A named, ordered collection of [`Step`]s defining one expressive motion
/// sequence. Step order is significant and fixed at definition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureDefinition {
    pub name: String,
    pub steps: Vec<Step>,
}

impl GestureDefinition {
    /// Start an empty gesture with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
        }
    }

    /// Append one step. Builder style so gesture tables read as data.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Session lifecycle state, mutated only by the connection supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    /// Motors active; the only state in which steps execute.
    PoweredOn,
    /// Connected but passively movable (motors released).
    Compliant,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::PoweredOn => "powered-on",
            ConnectionState::Compliant => "compliant",
        };
        write!(f, "{s}")
    }
}

/// Tri-state result of dispatching one step through the capability guard.
///
/// `Skipped` and `Failed` are equivalent for control flow; both leave the
/// rest of the gesture untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// The underlying actuation call was invoked and returned success.
    Applied,
    /// The channel is absent (or lacks the required capability); nothing
    /// was invoked.
    Skipped,
    /// The underlying call raised; the failure was contained.
    Failed(String),
}

/// Per-run tally returned by the choreographer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
    /// `true` when the run was cancelled before walking every step.
    pub aborted: bool,
}

impl GestureReport {
    /// Fold one dispatch outcome into the tally.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    /// Total number of dispatches the run issued or skipped.
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failed
    }
}

/// Error taxonomy. Only `ConnectionFailed` is fatal; everything else is
/// contained at the dispatch boundary and surfaces as an [`Outcome`].
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ChoreoError {
    #[error("failed to connect to robot at {address}: {details}")]
    ConnectionFailed { address: String, details: String },

    #[error("channel '{channel}' fault: {details}")]
    ChannelFault { channel: String, details: String },

    #[error("gesture refused: session is {0}, not powered on")]
    NotPoweredOn(ConnectionState),

    #[error("no active robot session")]
    NotConnected,
}
