//! [`ChannelRegistry`] – logical channel name resolution.
//!
//! Built once per session from the channels the connected robot actually
//! exposes. A robot may lack antennas or an arm; resolution therefore never
//! fails — an unknown name yields [`ChannelHandle::Absent`], a sentinel
//! consumed by the [`CapabilityGuard`][crate::guard::CapabilityGuard].
//!
//! The reserved name [`POSTURE_CHANNEL`] resolves to the session itself so
//! whole-body posture steps flow through the same dispatch path as
//! per-channel steps.

use std::collections::HashMap;
use std::sync::Arc;

use choreo_types::POSTURE_CHANNEL;
use tracing::debug;

use crate::channel::ActuatorChannel;
use crate::session::RobotSession;

/// Result of resolving one logical channel name.
#[derive(Clone)]
pub enum ChannelHandle {
    /// The channel is present on this configuration.
    Present(Arc<dyn ActuatorChannel>),
    /// The reserved whole-body pseudo-channel; commands go to the session.
    Session(Arc<dyn RobotSession>),
    /// The configuration lacks this channel. Dispatches degrade to no-ops.
    Absent,
}

impl ChannelHandle {
    pub fn is_absent(&self) -> bool {
        matches!(self, ChannelHandle::Absent)
    }
}

/// Maps logical channel names to capability handles on the connected robot.
///
/// Populated once at construction; the choreographer only reads it.
pub struct ChannelRegistry {
    session: Arc<dyn RobotSession>,
    channels: HashMap<String, Arc<dyn ActuatorChannel>>,
}

impl ChannelRegistry {
    /// Build the registry from a connected session, recording every channel
    /// the configuration exposes.
    pub fn from_session(session: Arc<dyn RobotSession>) -> Self {
        let mut channels = HashMap::new();
        for name in session.channel_names() {
            if let Some(ch) = session.channel(&name) {
                channels.insert(name, ch);
            }
        }
        debug!(count = channels.len(), "channel registry populated");
        Self { session, channels }
    }

    /// Resolve `name` to a handle. Never fails; unknown names are `Absent`.
    pub fn resolve(&self, name: &str) -> ChannelHandle {
        if name == POSTURE_CHANNEL {
            return ChannelHandle::Session(self.session.clone());
        }
        match self.channels.get(name) {
            Some(ch) => ChannelHandle::Present(ch.clone()),
            None => ChannelHandle::Absent,
        }
    }

    /// Names of all present channels, for startup diagnostics.
    pub fn present_channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimRobot;

    #[tokio::test]
    async fn resolves_present_channels_and_absents_missing_ones() {
        // Head-only configuration: no arms, no antennas.
        let session: Arc<dyn RobotSession> = Arc::new(SimRobot::builder().with_head().build());
        let registry = ChannelRegistry::from_session(session);

        assert!(matches!(registry.resolve("head"), ChannelHandle::Present(_)));
        assert!(registry.resolve("r_arm").is_absent());
        assert!(registry.resolve("l_antenna").is_absent());
        assert!(registry.resolve("no_such_limb").is_absent());
    }

    #[tokio::test]
    async fn body_resolves_to_the_session() {
        let session: Arc<dyn RobotSession> = Arc::new(SimRobot::builder().build());
        let registry = ChannelRegistry::from_session(session);
        assert!(matches!(
            registry.resolve(POSTURE_CHANNEL),
            ChannelHandle::Session(_)
        ));
    }

    #[tokio::test]
    async fn present_channels_lists_full_configuration() {
        let session: Arc<dyn RobotSession> = Arc::new(
            SimRobot::builder()
                .with_head()
                .with_arms()
                .with_antennas()
                .build(),
        );
        let registry = ChannelRegistry::from_session(session);
        assert_eq!(
            registry.present_channels(),
            vec!["head", "l_antenna", "l_arm", "r_antenna", "r_arm"]
        );
    }
}
