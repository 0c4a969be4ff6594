use macan_run_core::{Action, GameState, InputState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Scripted player for headless runs: runs right, jumps at random and
/// confirms every menu it lands on.
#[derive(Clone, Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    jump_chance: f64,
    resume: bool,
}

impl Autopilot {
    /// `jump_chance` must lie in `0..=1`.
    pub(crate) fn new(seed: u64, jump_chance: f64, resume: bool) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            jump_chance: jump_chance.clamp(0.0, 1.0),
            resume,
        }
    }

    /// Updates the input for the next tick given the current state.
    pub(crate) fn drive(&mut self, state: GameState, has_save: bool, input: &mut InputState) {
        match state {
            GameState::Menu => {
                input.release(Action::MoveRight);
                if self.resume && has_save {
                    self.resume = false;
                    tap(input, Action::LoadSave);
                } else {
                    tap(input, Action::Confirm);
                }
            }
            GameState::GameOver | GameState::LevelComplete => {
                input.release(Action::MoveRight);
                tap(input, Action::Confirm);
            }
            GameState::Paused => tap(input, Action::Pause),
            GameState::Running => {
                input.release(Action::Confirm);
                input.press(Action::MoveRight);
                if self.rng.gen_bool(self.jump_chance) {
                    tap(input, Action::Jump);
                }
            }
        }
    }
}

fn tap(input: &mut InputState, action: Action) {
    input.release(action);
    input.press(action);
}

#[cfg(test)]
mod tests {
    use super::*;
    use macan_run_core::InputSource;

    #[test]
    fn confirms_outside_of_play() {
        let mut pilot = Autopilot::new(1, 0.0, false);
        for state in [GameState::Menu, GameState::GameOver, GameState::LevelComplete] {
            let mut input = InputState::new();
            pilot.drive(state, false, &mut input);
            assert!(input.just_pressed(Action::Confirm));
            assert!(!input.is_held(Action::MoveRight));
        }
    }

    #[test]
    fn runs_right_while_playing() {
        let mut pilot = Autopilot::new(1, 0.0, false);
        let mut input = InputState::new();
        pilot.drive(GameState::Running, false, &mut input);
        assert!(input.is_held(Action::MoveRight));
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn certain_jumps_fire_every_tick() {
        let mut pilot = Autopilot::new(1, 1.0, false);
        let mut input = InputState::new();
        for _ in 0..3 {
            input.clear_just_pressed(Action::Jump);
            pilot.drive(GameState::Running, false, &mut input);
            assert!(input.just_pressed(Action::Jump));
        }
    }

    #[test]
    fn resumes_a_save_once() {
        let mut pilot = Autopilot::new(1, 0.0, true);
        let mut input = InputState::new();
        pilot.drive(GameState::Menu, true, &mut input);
        assert!(input.just_pressed(Action::LoadSave));

        let mut input = InputState::new();
        pilot.drive(GameState::Menu, true, &mut input);
        assert!(input.just_pressed(Action::Confirm));
    }

    #[test]
    fn same_seed_makes_the_same_choices() {
        let jumps = |seed| {
            let mut pilot = Autopilot::new(seed, 0.5, false);
            (0..64)
                .map(|_| {
                    let mut input = InputState::new();
                    pilot.drive(GameState::Running, false, &mut input);
                    input.just_pressed(Action::Jump)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(jumps(9), jumps(9));
    }
}
