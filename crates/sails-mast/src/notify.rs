//! Reporting a resolved placement back to whoever placed it.

use crate::orientation::OrientationState;

/// Whether a placement is a speculative preview or the real world write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementMode {
    Preview,
    Authoritative,
}

/// Text channel addressed to a placing actor.
pub trait PlacementNotifier {
    fn send(&mut self, actor: &str, message: &str);
}

pub fn placement_message(state: OrientationState) -> String {
    format!("Mast placed: {state}")
}

/// Sends the placement message, but only for the authoritative write.
/// Returns whether anything was sent.
pub fn notify_placed(
    notifier: &mut dyn PlacementNotifier,
    actor: &str,
    state: OrientationState,
    mode: PlacementMode,
) -> bool {
    if mode != PlacementMode::Authoritative {
        return false;
    }
    notifier.send(actor, &placement_message(state));
    true
}

/// Keeps every message and echoes it to the `placement` log target.
#[derive(Default, Debug, Clone)]
pub struct Outbox {
    pub messages: Vec<(String, String)>,
}

impl PlacementNotifier for Outbox {
    fn send(&mut self, actor: &str, message: &str) {
        log::info!(target: "placement", "[to {}] {}", actor, message);
        self.messages.push((actor.to_string(), message.to_string()));
    }
}
