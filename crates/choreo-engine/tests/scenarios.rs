//! End-to-end scenarios: built-in gestures executed on simulated robot
//! configurations through the full supervisor → choreographer → guard path.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use choreo_engine::choreographer::abort_channel;
use choreo_engine::{library, ConnectionSupervisor};
use choreo_hal::sim::{DispatchRecord, SimRobot};
use choreo_hal::{RobotDriver, RobotSession};
use choreo_types::{ChoreoError, Target};

/// Driver handing out one pre-built robot so the test keeps a timeline handle.
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

#[async_trait]
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

async fn powered_supervisor(robot: Arc<SimRobot>) -> ConnectionSupervisor {
    let mut supervisor = ConnectionSupervisor::new(FixedDriver::new(robot));
    supervisor.connect("sim://robot").await.unwrap();
    supervisor.power_on().await.unwrap();
    supervisor
}

/// Last commanded target per channel — the resting pose after a run.
fn final_targets(records: &[DispatchRecord]) -> Vec<(String, Target)> {
    let mut finals: Vec<(String, Target)> = Vec::new();
    for record in records {
        if let Some(entry) = finals.iter_mut().find(|(ch, _)| *ch == record.channel) {
            entry.1 = record.target.clone();
        } else {
            finals.push((record.channel.clone(), record.target.clone()));
        }
    }
    finals.sort_by(|a, b| a.0.cmp(&b.0));
    finals
}

#[tokio::test(start_paused = true)]
async fn nod_issues_exactly_nine_awaited_head_dispatches() {
    let robot = Arc::new(SimRobot::builder().with_head().build());
    let timeline = robot.timeline();
    let supervisor = powered_supervisor(robot).await;
    let (_tx, mut rx) = abort_channel();

    let report = supervisor
        .run_gesture(&library::nod(), &mut rx)
        .await
        .unwrap();
    assert_eq!(report.applied, 9);
    assert!(!report.aborted);

    let recorded = timeline.lock().unwrap();
    assert_eq!(recorded.len(), 9);
    assert!(recorded.iter().all(|r| r.channel == "head" && r.wait));

    let up = Target::Joints(vec![0.0, 10.0, 0.0]);
    let down = Target::Joints(vec![0.0, -5.0, 0.0]);
    let level = Target::Joints(vec![0.0, 0.0, 0.0]);
    let expected = vec![&up, &down, &up, &down, &up, &down, &up, &down, &level];
    let actual: Vec<&Target> = recorded.iter().map(|r| &r.target).collect();
    assert_eq!(actual, expected);
}

#[tokio::test(start_paused = true)]
async fn home_twice_settles_on_the_same_final_pose_as_once() {
    let once = {
        let robot = Arc::new(SimRobot::builder().with_head().with_arms().build());
        let timeline = robot.timeline();
        let supervisor = powered_supervisor(robot).await;
        let (_tx, mut rx) = abort_channel();
        supervisor
            .run_gesture(&library::home(), &mut rx)
            .await
            .unwrap();
        let records = timeline.lock().unwrap().clone();
        final_targets(&records)
    };

    let twice = {
        let robot = Arc::new(SimRobot::builder().with_head().with_arms().build());
        let timeline = robot.timeline();
        let supervisor = powered_supervisor(robot).await;
        let (_tx, mut rx) = abort_channel();
        supervisor
            .run_gesture(&library::home(), &mut rx)
            .await
            .unwrap();
        supervisor
            .run_gesture(&library::home(), &mut rx)
            .await
            .unwrap();
        let records = timeline.lock().unwrap().clone();
        final_targets(&records)
    };

    assert_eq!(once, twice);
}

#[tokio::test(start_paused = true)]
async fn shrug_on_an_armless_robot_degrades_but_completes() {
    let robot = Arc::new(SimRobot::builder().with_head().with_antennas().build());
    let timeline = robot.timeline();
    let supervisor = powered_supervisor(robot).await;
    let (_tx, mut rx) = abort_channel();

    let gesture = library::shrug();
    let report = supervisor.run_gesture(&gesture, &mut rx).await.unwrap();

    // Both arm steps are skipped; everything else lands.
    assert_eq!(report.skipped, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.total(), gesture.len());
    assert!(!report.aborted);

    let recorded = timeline.lock().unwrap();
    assert!(recorded.iter().all(|r| r.channel != "r_arm" && r.channel != "l_arm"));
    // Present channels still received their full step sequence.
    assert_eq!(recorded.iter().filter(|r| r.channel == "head").count(), 2);
    assert_eq!(recorded.iter().filter(|r| r.channel == "l_antenna").count(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_builtin_gesture_completes_on_every_configuration() {
    // Subsets of mounted channels, including the empty robot.
    let configurations: Vec<fn() -> SimRobot> = vec![
        || SimRobot::builder().build(),
        || SimRobot::builder().with_head().build(),
        || SimRobot::builder().with_arms().build(),
        || SimRobot::builder().with_head().with_antennas().build(),
        || {
            SimRobot::builder()
                .with_head()
                .with_arms()
                .with_antennas()
                .build()
        },
    ];

    for make_robot in configurations {
        for gesture in library::all() {
            let robot = Arc::new(make_robot());
            let supervisor = powered_supervisor(robot).await;
            let (_tx, mut rx) = abort_channel();

            let report = supervisor.run_gesture(&gesture, &mut rx).await.unwrap();
            assert_eq!(report.total(), gesture.len(), "gesture '{}'", gesture.name);
            assert!(!report.aborted);
            assert_eq!(report.failed, 0);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn cancelled_gesture_routes_cleanly_into_shutdown() {
    let robot = Arc::new(SimRobot::builder().with_head().build());
    let events = robot.power_events();
    let mut supervisor = powered_supervisor(robot).await;
    let (tx, mut rx) = abort_channel();

    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let _ = tx.send(true);
    });

    let report = supervisor
        .run_gesture(&library::nod(), &mut rx)
        .await
        .unwrap();
    assert!(report.aborted);

    // Operator abort always continues into the shutdown path.
    supervisor.disconnect().await;
    assert_eq!(
        supervisor.state(),
        choreo_types::ConnectionState::Disconnected
    );
    let recorded = events.lock().unwrap();
    assert!(recorded.contains(&choreo_hal::sim::PowerEvent::PowerOffSmoothly));
    assert_eq!(*recorded.last().unwrap(), choreo_hal::sim::PowerEvent::Closed);
}
