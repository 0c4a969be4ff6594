//! Translates player overlaps into score, damage and pickups.

use glam::Vec2;
use macan_run_core::{sounds, AudioSink, Bounded, EffectKind, Event, Rgb};
use macan_run_system_particles::ParticleSystem;
use macan_run_system_physics::check_collision;
use macan_run_world::{LevelPartsMut, Player};

/// Score granted per coin.
pub const COIN_SCORE: u64 = 100;
/// Score granted for a stomp that kills.
pub const STOMP_KILL_SCORE: u64 = 50;
/// Score granted for a stomp that only wounds.
pub const STOMP_HIT_SCORE: u64 = 25;
/// Upward velocity given to the player after a stomp.
pub const STOMP_BOUNCE_VELOCITY: f32 = -300.0;

/// Running totals carried across levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scoreboard {
    /// Accumulated score.
    pub score: u64,
    /// Coins collected.
    pub coins: u32,
}

/// Outlets for the side effects of a collision pass.
pub struct Feedback<'a> {
    /// Sound effect sink.
    pub audio: &'a mut dyn AudioSink,
    /// Cosmetic particle pool.
    pub particles: &'a mut ParticleSystem,
    /// Events reported to the caller.
    pub out_events: &'a mut Vec<Event>,
}

/// Resolves every player overlap in the fixed order coins, power-ups,
/// enemies, spikes, finish.
///
/// Returns whether the player touches the finish flag.
pub fn resolve(
    parts: &mut LevelPartsMut<'_>,
    scoreboard: &mut Scoreboard,
    feedback: &mut Feedback<'_>,
) -> bool {
    collect_coins(parts, scoreboard, feedback);
    collect_power_ups(parts, feedback);
    strike_enemies(parts, scoreboard, feedback);
    touch_spikes(parts, feedback);

    parts
        .finish
        .is_some_and(|finish| check_collision(&*parts.player, finish))
}

fn collect_coins(
    parts: &mut LevelPartsMut<'_>,
    scoreboard: &mut Scoreboard,
    feedback: &mut Feedback<'_>,
) {
    let mut index = 0;
    while index < parts.coins.len() {
        if !check_collision(&*parts.player, &parts.coins[index]) {
            index += 1;
            continue;
        }
        let coin = parts.coins.remove(index);
        scoreboard.score += COIN_SCORE;
        scoreboard.coins += 1;
        feedback.audio.play_effect(sounds::COIN);
        feedback.particles.emit_coin_sparkle(center_of(&coin));
        feedback.out_events.push(Event::CoinCollected {
            score: scoreboard.score,
            coins: scoreboard.coins,
        });
    }
}

fn collect_power_ups(parts: &mut LevelPartsMut<'_>, feedback: &mut Feedback<'_>) {
    let mut index = 0;
    while index < parts.power_ups.len() {
        let power_up = parts.power_ups[index];
        if !check_collision(&*parts.player, &power_up) {
            index += 1;
            continue;
        }
        let kind = power_up.kind();
        if !power_up.apply_to_player(parts.player) {
            tracing::debug!(effect = kind.name(), "power-up rejected");
            feedback.out_events.push(Event::PowerUpRejected { kind });
            index += 1;
            continue;
        }
        let _ = parts.power_ups.remove(index);
        feedback.audio.play_effect(sounds::COIN);
        feedback
            .particles
            .emit_burst(center_of(&power_up), 15, effect_color(kind));
        feedback.out_events.push(Event::PowerUpCollected { kind });
    }
}

fn strike_enemies(
    parts: &mut LevelPartsMut<'_>,
    scoreboard: &mut Scoreboard,
    feedback: &mut Feedback<'_>,
) {
    let mut index = 0;
    while index < parts.enemies.len() {
        let enemy = &mut parts.enemies[index];
        if !check_collision(&*parts.player, &*enemy) {
            index += 1;
            continue;
        }

        if parts.player.vy > 0.0 && parts.player.y < enemy.y() {
            let kind = enemy.kind();
            let killed = enemy.take_damage(1);
            feedback.audio.play_effect(sounds::HIT);
            if killed {
                let enemy = parts.enemies.remove(index);
                scoreboard.score += STOMP_KILL_SCORE;
                feedback.particles.emit_enemy_death(center_of(&enemy));
            } else {
                scoreboard.score += STOMP_HIT_SCORE;
                index += 1;
            }
            parts.player.vy = STOMP_BOUNCE_VELOCITY;
            feedback.out_events.push(Event::EnemyStomped { kind, killed });
        } else {
            hurt(parts.player, feedback);
            index += 1;
        }
    }
}

fn touch_spikes(parts: &mut LevelPartsMut<'_>, feedback: &mut Feedback<'_>) {
    for spike in parts.spikes {
        if check_collision(&*parts.player, spike) {
            hurt(parts.player, feedback);
        }
    }
}

fn hurt(player: &mut Player, feedback: &mut Feedback<'_>) {
    if !player.take_damage(1) {
        return;
    }
    feedback.audio.play_effect(sounds::HIT);
    feedback.particles.emit_damage(center_of(&*player));
    feedback.out_events.push(Event::PlayerDamaged {
        health: player.health,
    });
}

/// Center of a body as a particle origin.
pub(crate) fn center_of<B: Bounded + ?Sized>(body: &B) -> Vec2 {
    let (x, y) = body.bounds().center();
    Vec2::new(x, y)
}

/// Tint used for the pickup burst of each effect.
#[must_use]
pub const fn effect_color(kind: EffectKind) -> Rgb {
    match kind {
        EffectKind::Speed => Rgb::from_rgb(100, 200, 255),
        EffectKind::Shield => Rgb::from_rgb(200, 200, 100),
        EffectKind::TripleJump => Rgb::from_rgb(200, 100, 255),
        EffectKind::Health => Rgb::from_rgb(255, 100, 100),
    }
}
