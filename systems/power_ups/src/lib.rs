#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ages timed power-up effects on the player and reverts the expired ones.

use macan_run_core::{EffectKind, Event};
use macan_run_world::Player;

/// Pure system that counts down the player's effect timers.
#[derive(Debug, Default)]
pub struct PowerUpManager {
    expired: Vec<EffectKind>,
}

impl PowerUpManager {
    /// Creates a manager with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subtracts `dt` from every active timer, reverting each one that runs out.
    pub fn update(&mut self, dt: f32, player: &mut Player, out_events: &mut Vec<Event>) {
        self.expired.clear();
        for (kind, remaining) in player.active_effects.iter_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.expired.push(*kind);
            }
        }

        for kind in self.expired.drain(..) {
            let _ = player.active_effects.remove(&kind);
            revert(kind, player);
            tracing::debug!(effect = kind.name(), "power-up expired");
            out_events.push(Event::PowerUpExpired { kind });
        }
    }
}

/// Undoes the lasting change a timed effect made to the player.
pub fn revert(kind: EffectKind, player: &mut Player) {
    match kind {
        EffectKind::Speed => player.move_speed = player.base_move_speed,
        EffectKind::Shield => player.has_shield = false,
        EffectKind::TripleJump => {
            player.max_jumps = player.base_max_jumps;
            player.jumps_remaining = player.jumps_remaining.min(player.max_jumps);
        }
        EffectKind::Health => {}
    }
}
