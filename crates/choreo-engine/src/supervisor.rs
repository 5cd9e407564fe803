//! [`ConnectionSupervisor`] – session lifecycle and power state.
//!
//! Owns the [`RobotDriver`], the live session, the [`ChannelRegistry`], and
//! the single [`ConnectionState`] instance. Nothing else mutates the state.
//!
//! State graph:
//!
//! ```text
//! Disconnected ──connect──▶ Connected ──power_on──▶ PoweredOn
//!                               ▲                       │
//!                               │            power_off(_smoothly)
//!                               │                       ▼
//! Disconnected ◀──disconnect── Compliant ◀──────────────┘
//! ```
//!
//! `disconnect` is reachable from any state and always passes through
//! Compliant first (an implicit smooth power-off), so the robot is never
//! left powered and abandoned when the controlling process exits.

use std::sync::Arc;

use choreo_hal::{ChannelRegistry, RobotDriver, RobotSession};
use choreo_types::{ChoreoError, ConnectionState, GestureDefinition, GestureReport};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::choreographer::Choreographer;

/// Owns the connection to one robot and its power state.
pub struct ConnectionSupervisor {
    driver: Box<dyn RobotDriver>,
    session: Option<Arc<dyn RobotSession>>,
    registry: Option<ChannelRegistry>,
    state: ConnectionState,
}

impl ConnectionSupervisor {
    pub fn new(driver: Box<dyn RobotDriver>) -> Self {
        Self {
            driver,
            session: None,
            registry: None,
            state: ConnectionState::Disconnected,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Pure query; does not mutate state.
    pub fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.is_connected())
            .unwrap_or(false)
    }

    /// The registry built from the current session, if connected.
    pub fn registry(&self) -> Option<&ChannelRegistry> {
        self.registry.as_ref()
    }

    /// Establish a session and populate the channel registry.
    ///
    /// An existing session is first torn down through the normal shutdown
    /// path, so reconnecting never leaves the previous robot powered.
    ///
    /// # Errors
    ///
    /// [`ChoreoError::ConnectionFailed`] is the one fatal error in the
    /// system; on failure the supervisor stays Disconnected and the caller
    /// must not run gestures.
    pub async fn connect(&mut self, address: &str) -> Result<(), ChoreoError> {
        if self.state != ConnectionState::Disconnected {
            self.disconnect().await;
        }

        let session = self.driver.connect(address).await?;
        let registry = ChannelRegistry::from_session(session.clone());
        info!(
            address,
            channels = ?registry.present_channels(),
            "session established"
        );

        self.session = Some(session);
        self.registry = Some(registry);
        self.state = ConnectionState::Connected;
        Ok(())
    }

    /// Connected | Compliant → PoweredOn.
    pub async fn power_on(&mut self) -> Result<(), ChoreoError> {
        let session = self.session.as_ref().ok_or(ChoreoError::NotConnected)?;
        if self.state == ConnectionState::PoweredOn {
            return Ok(());
        }
        session.power_on().await?;
        self.state = ConnectionState::PoweredOn;
        info!("motors powered on");
        Ok(())
    }

    /// PoweredOn → Compliant with an instantaneous cut.
    pub async fn power_off(&mut self) -> Result<(), ChoreoError> {
        let session = self.session.as_ref().ok_or(ChoreoError::NotConnected)?;
        session.power_off().await?;
        self.state = ConnectionState::Compliant;
        info!("motors powered off");
        Ok(())
    }

    /// PoweredOn → Compliant with bounded deceleration.
    pub async fn power_off_smoothly(&mut self) -> Result<(), ChoreoError> {
        let session = self.session.as_ref().ok_or(ChoreoError::NotConnected)?;
        session.power_off_smoothly().await?;
        self.state = ConnectionState::Compliant;
        info!("motors released smoothly");
        Ok(())
    }

    /// Any state → Disconnected, always via Compliant.
    ///
    /// Best-effort: shutdown failures are logged, never propagated, and the
    /// supervisor always ends Disconnected.
    pub async fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            if self.state != ConnectionState::Compliant {
                if let Err(e) = session.power_off_smoothly().await {
                    warn!(error = %e, "smooth power-off during disconnect failed");
                }
                self.state = ConnectionState::Compliant;
            }
            if let Err(e) = session.close().await {
                warn!(error = %e, "session close failed");
            }
            info!("disconnected from robot");
        }
        self.registry = None;
        self.state = ConnectionState::Disconnected;
    }

    /// Run one gesture through the choreographer.
    ///
    /// # Errors
    ///
    /// [`ChoreoError::NotPoweredOn`] when the session is not in PoweredOn —
    /// no step ever executes outside that state.
    pub async fn run_gesture(
        &self,
        gesture: &GestureDefinition,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<GestureReport, ChoreoError> {
        if self.state != ConnectionState::PoweredOn {
            return Err(ChoreoError::NotPoweredOn(self.state));
        }
        // Registry exists whenever a session does.
        let registry = self.registry.as_ref().ok_or(ChoreoError::NotConnected)?;
        let choreographer = Choreographer::new(registry);
        Ok(choreographer.run(gesture, cancel).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choreographer::abort_channel;
    use choreo_hal::sim::{PowerEvent, SimDriver, SimRobot};
    use choreo_types::Step;
    use std::sync::Mutex;

    /// Driver handing out one pre-built robot so tests can keep handles to
    /// its timeline and power-event log.
    struct FixedDriver {
        robot: Mutex<Option<Arc<SimRobot>>>,
    }

    impl FixedDriver {
        fn new(robot: Arc<SimRobot>) -> Box<Self> {
            Box::new(Self {
                robot: Mutex::new(Some(robot)),
            })
        }
    }

    #[async_trait::async_trait]
    impl RobotDriver for FixedDriver {
        async fn connect(&self, address: &str) -> Result<Arc<dyn RobotSession>, ChoreoError> {
            self.robot
                .lock()
                .unwrap()
                .take()
                .map(|r| r as Arc<dyn RobotSession>)
                .ok_or_else(|| ChoreoError::ConnectionFailed {
                    address: address.to_string(),
                    details: "already consumed".to_string(),
                })
        }
    }

    #[tokio::test]
    async fn connect_then_disconnect_ends_disconnected() {
        let mut supervisor = ConnectionSupervisor::new(Box::new(SimDriver::full()));
        supervisor.connect("sim://robot").await.unwrap();
        assert_eq!(supervisor.state(), ConnectionState::Connected);
        assert!(supervisor.is_connected());

        supervisor.disconnect().await;
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
        assert!(!supervisor.is_connected());
    }

    #[tokio::test]
    async fn disconnect_from_powered_passes_through_compliant() {
        let robot = Arc::new(SimRobot::builder().with_head().build());
        let events = robot.power_events();
        let mut supervisor = ConnectionSupervisor::new(FixedDriver::new(robot));

        supervisor.connect("sim://robot").await.unwrap();
        supervisor.power_on().await.unwrap();
        assert_eq!(supervisor.state(), ConnectionState::PoweredOn);

        supervisor.disconnect().await;
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                PowerEvent::PowerOn,
                PowerEvent::PowerOffSmoothly,
                PowerEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn disconnect_when_already_compliant_skips_power_off() {
        let robot = Arc::new(SimRobot::builder().build());
        let events = robot.power_events();
        let mut supervisor = ConnectionSupervisor::new(FixedDriver::new(robot));

        supervisor.connect("sim://robot").await.unwrap();
        supervisor.power_on().await.unwrap();
        supervisor.power_off_smoothly().await.unwrap();
        assert_eq!(supervisor.state(), ConnectionState::Compliant);

        supervisor.disconnect().await;
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                PowerEvent::PowerOn,
                PowerEvent::PowerOffSmoothly,
                PowerEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn failed_connection_is_fatal_and_leaves_disconnected() {
        let mut supervisor = ConnectionSupervisor::new(Box::new(SimDriver::unreachable()));
        let result = supervisor.connect("sim://nowhere").await;
        assert!(matches!(result, Err(ChoreoError::ConnectionFailed { .. })));
        assert_eq!(supervisor.state(), ConnectionState::Disconnected);
        assert!(supervisor.registry().is_none());
    }

    #[tokio::test]
    async fn gestures_are_refused_unless_powered_on() {
        let mut supervisor = ConnectionSupervisor::new(Box::new(SimDriver::full()));
        let (_tx, mut rx) = abort_channel();
        let gesture = GestureDefinition::named("nod")
            .step(Step::joints("head", vec![0.0, 10.0, 0.0], 0.3));

        let result = supervisor.run_gesture(&gesture, &mut rx).await;
        assert!(matches!(
            result,
            Err(ChoreoError::NotPoweredOn(ConnectionState::Disconnected))
        ));

        supervisor.connect("sim://robot").await.unwrap();
        let result = supervisor.run_gesture(&gesture, &mut rx).await;
        assert!(matches!(
            result,
            Err(ChoreoError::NotPoweredOn(ConnectionState::Connected))
        ));

        supervisor.power_on().await.unwrap();
        let report = supervisor.run_gesture(&gesture, &mut rx).await.unwrap();
        assert_eq!(report.applied, 1);
    }

    #[tokio::test]
    async fn power_ops_without_session_report_not_connected() {
        let mut supervisor = ConnectionSupervisor::new(Box::new(SimDriver::full()));
        assert!(matches!(
            supervisor.power_on().await,
            Err(ChoreoError::NotConnected)
        ));
        assert!(matches!(
            supervisor.power_off().await,
            Err(ChoreoError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn power_on_is_idempotent() {
        let robot = Arc::new(SimRobot::builder().build());
        let events = robot.power_events();
        let mut supervisor = ConnectionSupervisor::new(FixedDriver::new(robot));

        supervisor.connect("sim://robot").await.unwrap();
        supervisor.power_on().await.unwrap();
        supervisor.power_on().await.unwrap();
        assert_eq!(*events.lock().unwrap(), vec![PowerEvent::PowerOn]);
    }
}
