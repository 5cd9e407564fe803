//! `choreo-hal` – the actuation boundary.
//!
//! Everything above this crate talks to the robot exclusively through the
//! traits defined here, so drivers can be swapped without touching the
//! choreography engine.
//!
//! # Modules
//!
//! - [`channel`] – [`ActuatorChannel`][channel::ActuatorChannel]: one
//!   independently addressable actuator group (an arm, the head, one
//!   antenna) with its capability set.
//! - [`session`] – [`RobotSession`][session::RobotSession] /
//!   [`RobotDriver`][session::RobotDriver]: a live connection to one robot
//!   and the connector that establishes it.
//! - [`registry`] – [`ChannelRegistry`][registry::ChannelRegistry]: maps
//!   logical channel names to handles, built once per session. Resolution
//!   never fails; unknown names yield
//!   [`ChannelHandle::Absent`][registry::ChannelHandle].
//! - [`guard`] – [`CapabilityGuard`][guard::CapabilityGuard]: wraps every
//!   dispatch so an absent or failing channel degrades to a no-op instead
//!   of aborting the caller.
//! - [`sim`] – [`SimRobot`][sim::SimRobot]: in-process simulated robot that
//!   records every dispatch, for headless tests and demo runs without
//!   hardware.

pub mod channel;
pub mod guard;
pub mod registry;
pub mod session;
pub mod sim;

pub use channel::ActuatorChannel;
pub use guard::CapabilityGuard;
pub use registry::{ChannelHandle, ChannelRegistry};
pub use session::{RobotDriver, RobotSession};
pub use sim::{SimDriver, SimRobot};
