//! In-process simulated robot for headless tests and hardware-free demos.
//!
//! [`SimRobot`] implements [`RobotSession`] with stub channels that record
//! every dispatch into a shared timeline and simulate motion time with
//! [`tokio::time::sleep`]. Tests assert on the timeline; paused-clock tests
//! assert on virtual wall time.
//!
//! # Example
//!
//! ```rust
//! use choreo_hal::sim::SimRobot;
//!
//! let robot = SimRobot::builder().with_head().with_arms().build();
//! let timeline = robot.timeline();
//! // ... run gestures, then assert on `timeline` ...
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use choreo_types::{ChannelCapability, ChoreoError, RotationAxis, Target, POSTURE_CHANNEL};
use tracing::info;

use crate::channel::ActuatorChannel;
use crate::session::{RobotDriver, RobotSession};

/// One recorded actuation call, in dispatch order across all channels.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRecord {
    pub channel: String,
    pub target: Target,
    /// The `wait` flag the call was issued with.
    pub wait: bool,
}

/// Timeline shared by every channel of one [`SimRobot`].
pub type SharedTimeline = Arc<Mutex<Vec<DispatchRecord>>>;

/// Session-level lifecycle events, for supervisor tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerEvent {
    PowerOn,
    PowerOff,
    PowerOffSmoothly,
    Closed,
}

// ────────────────────────────────────────────────────────────────────────────
// Stub channel
// ────────────────────────────────────────────────────────────────────────────

/// A simulated actuator group. Records each command; sleeps for the scaled
/// motion duration when `wait` is set.
struct SimChannel {
    name: String,
    capabilities: HashSet<ChannelCapability>,
    timeline: SharedTimeline,
    /// When set, every command fails with a channel fault.
    failing: bool,
    time_scale: f32,
}

impl SimChannel {
    fn record(&self, target: Target, wait: bool) -> Result<(), ChoreoError> {
        if self.failing {
            return Err(ChoreoError::ChannelFault {
                channel: self.name.clone(),
                details: "simulated servo fault".to_string(),
            });
        }
        self.timeline.lock().unwrap().push(DispatchRecord {
            channel: self.name.clone(),
            target,
            wait,
        });
        Ok(())
    }

    async fn motion(&self, duration: Duration, wait: bool) {
        if wait {
            tokio::time::sleep(duration.mul_f32(self.time_scale)).await;
        }
    }
}

#[async_trait]
impl ActuatorChannel for SimChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> HashSet<ChannelCapability> {
        self.capabilities.clone()
    }

    async fn goto_joints(
        &self,
        pose: &[f32],
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError> {
        self.record(Target::Joints(pose.to_vec()), wait)?;
        self.motion(duration, wait).await;
        Ok(())
    }

    async fn look_at(&self, x: f32, y: f32, z: f32) -> Result<(), ChoreoError> {
        self.record(Target::LookAt { x, y, z }, false)
    }

    async fn rotate_by(
        &self,
        axis: RotationAxis,
        degrees: f32,
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError> {
        self.record(Target::RotateBy { axis, degrees }, wait)?;
        self.motion(duration, wait).await;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRobot
// ────────────────────────────────────────────────────────────────────────────

/// Simulated robot session. Build with [`SimRobot::builder`].
pub struct SimRobot {
    channels: HashMap<String, Arc<SimChannel>>,
    timeline: SharedTimeline,
    events: Arc<Mutex<Vec<PowerEvent>>>,
    connected: AtomicBool,
    time_scale: f32,
}

impl SimRobot {
    pub fn builder() -> SimRobotBuilder {
        SimRobotBuilder::default()
    }

    /// Handle to the shared dispatch timeline. Records appear in the order
    /// dispatches were issued across all channels.
    pub fn timeline(&self) -> SharedTimeline {
        self.timeline.clone()
    }

    /// Handle to the recorded session lifecycle events.
    pub fn power_events(&self) -> Arc<Mutex<Vec<PowerEvent>>> {
        self.events.clone()
    }
}

#[async_trait]
impl RobotSession for SimRobot {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    fn channel(&self, name: &str) -> Option<Arc<dyn ActuatorChannel>> {
        self.channels
            .get(name)
            .map(|ch| ch.clone() as Arc<dyn ActuatorChannel>)
    }

    async fn power_on(&self) -> Result<(), ChoreoError> {
        self.events.lock().unwrap().push(PowerEvent::PowerOn);
        Ok(())
    }

    async fn power_off(&self) -> Result<(), ChoreoError> {
        self.events.lock().unwrap().push(PowerEvent::PowerOff);
        Ok(())
    }

    async fn power_off_smoothly(&self) -> Result<(), ChoreoError> {
        self.events.lock().unwrap().push(PowerEvent::PowerOffSmoothly);
        Ok(())
    }

    async fn goto_posture(
        &self,
        name: &str,
        duration: Duration,
        wait: bool,
    ) -> Result<(), ChoreoError> {
        self.timeline.lock().unwrap().push(DispatchRecord {
            channel: POSTURE_CHANNEL.to_string(),
            target: Target::Posture(name.to_string()),
            wait,
        });
        if wait {
            tokio::time::sleep(duration.mul_f32(self.time_scale)).await;
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), ChoreoError> {
        self.events.lock().unwrap().push(PowerEvent::Closed);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builder selecting which channels the simulated configuration exposes.
///
/// An empty builder yields a robot with no channels at all — useful for the
/// all-absent degradation tests.
#[derive(Default)]
pub struct SimRobotBuilder {
    heads: bool,
    arms: bool,
    antennas: bool,
    failing: HashSet<String>,
    time_scale: Option<f32>,
}

impl SimRobotBuilder {
    /// Add a `"head"` channel supporting joint moves, gaze targets, and
    /// relative rotations.
    pub fn with_head(mut self) -> Self {
        self.heads = true;
        self
    }

    /// Add `"r_arm"` and `"l_arm"` joint-move channels.
    pub fn with_arms(mut self) -> Self {
        self.arms = true;
        self
    }

    /// Add `"l_antenna"` and `"r_antenna"` single-joint channels.
    pub fn with_antennas(mut self) -> Self {
        self.antennas = true;
        self
    }

    /// Make every command on `name` fail with a simulated servo fault.
    pub fn failing_channel(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Scale simulated motion durations (1.0 = real time, 0.0 = instant).
    pub fn time_scale(mut self, scale: f32) -> Self {
        self.time_scale = Some(scale);
        self
    }

    pub fn build(self) -> SimRobot {
        let timeline: SharedTimeline = Arc::new(Mutex::new(Vec::new()));
        let time_scale = self.time_scale.unwrap_or(1.0);
        let mut channels = HashMap::new();

        let mut add = |name: &str, caps: HashSet<ChannelCapability>| {
            channels.insert(
                name.to_string(),
                Arc::new(SimChannel {
                    name: name.to_string(),
                    capabilities: caps,
                    timeline: timeline.clone(),
                    failing: self.failing.contains(name),
                    time_scale,
                }),
            );
        };

        if self.heads {
            add(
                "head",
                HashSet::from([
                    ChannelCapability::JointMove,
                    ChannelCapability::LookAt,
                    ChannelCapability::RotateBy,
                ]),
            );
        }
        if self.arms {
            for name in ["r_arm", "l_arm"] {
                add(name, HashSet::from([ChannelCapability::JointMove]));
            }
        }
        if self.antennas {
            for name in ["l_antenna", "r_antenna"] {
                add(name, HashSet::from([ChannelCapability::JointMove]));
            }
        }

        SimRobot {
            channels,
            timeline,
            events: Arc::new(Mutex::new(Vec::new())),
            connected: AtomicBool::new(true),
            time_scale,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Driver
// ────────────────────────────────────────────────────────────────────────────

/// [`RobotDriver`] producing simulated sessions.
///
/// `SimDriver::full()` connects a complete configuration;
/// `SimDriver::unreachable()` fails every connection attempt, for the fatal
/// error path.
pub struct SimDriver {
    reachable: bool,
    time_scale: f32,
}

impl SimDriver {
    /// Driver whose sessions expose the full channel set.
    pub fn full() -> Self {
        Self {
            reachable: true,
            time_scale: 1.0,
        }
    }

    /// Same as [`full`][Self::full] with scaled motion durations.
    pub fn full_with_time_scale(time_scale: f32) -> Self {
        Self {
            reachable: true,
            time_scale,
        }
    }

    /// Driver that refuses every connection attempt.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            time_scale: 1.0,
        }
    }
}

#[async_trait]
impl RobotDriver for SimDriver {
    async fn connect(&self, address: &str) -> Result<Arc<dyn RobotSession>, ChoreoError> {
        if !self.reachable {
            return Err(ChoreoError::ConnectionFailed {
                address: address.to_string(),
                details: "simulated robot unreachable".to_string(),
            });
        }
        info!(address, "simulated session established");
        Ok(Arc::new(
            SimRobot::builder()
                .with_head()
                .with_arms()
                .with_antennas()
                .time_scale(self.time_scale)
                .build(),
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sim_channel_records_dispatches_in_order() {
        let robot = SimRobot::builder().with_head().time_scale(0.0).build();
        let head = robot.channel("head").unwrap();

        head.goto_joints(&[0.0, 10.0, 0.0], Duration::from_millis(300), true)
            .await
            .unwrap();
        head.look_at(0.5, 0.2, 0.1).await.unwrap();

        let timeline = robot.timeline();
        let recorded = timeline.lock().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].target, Target::Joints(vec![0.0, 10.0, 0.0]));
        assert!(recorded[0].wait);
        assert_eq!(recorded[1].target, Target::LookAt { x: 0.5, y: 0.2, z: 0.1 });
    }

    #[tokio::test]
    async fn failing_channel_records_nothing() {
        let robot = SimRobot::builder()
            .with_head()
            .failing_channel("head")
            .build();
        let head = robot.channel("head").unwrap();

        let result = head
            .goto_joints(&[0.0, 0.0, 0.0], Duration::from_millis(100), false)
            .await;
        assert!(matches!(result, Err(ChoreoError::ChannelFault { .. })));
        assert!(robot.timeline().lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_marks_session_disconnected() {
        let robot = SimRobot::builder().build();
        assert!(robot.is_connected());
        robot.close().await.unwrap();
        assert!(!robot.is_connected());
        assert_eq!(*robot.power_events().lock().unwrap(), vec![PowerEvent::Closed]);
    }

    #[tokio::test]
    async fn unreachable_driver_fails_connection() {
        let driver = SimDriver::unreachable();
        let result = driver.connect("sim://robot").await;
        assert!(matches!(
            result,
            Err(ChoreoError::ConnectionFailed { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_dispatch_takes_the_motion_duration() {
        let robot = SimRobot::builder().with_head().build();
        let head = robot.channel("head").unwrap();

        let start = tokio::time::Instant::now();
        head.goto_joints(&[0.0, 10.0, 0.0], Duration::from_millis(300), true)
            .await
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));

        // Fire-and-forget returns immediately.
        let start = tokio::time::Instant::now();
        head.goto_joints(&[0.0, 0.0, 0.0], Duration::from_millis(300), false)
            .await
            .unwrap();
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
