use bevy::prelude::{Component, Reflect};
use serde::{Deserialize, Serialize};

pub const WALK_SPEED: f32 = 0.5;
pub const RUN_SPEED: f32 = 1.0;
pub const SPRINT_SPEED: f32 = 2.0;
pub const SPEED_DAMP_TIME: f32 = 0.1;
pub const JUMP_HEIGHT: f32 = 1.5;
pub const JUMP_INERTIAL_FORCE: f32 = 10.0;
pub const ANIM_SPEED: f32 = 1.0;

/// Degrees per second for policy-driven yaw.
pub const POLICY_TURN_RATE_DEGREES: f32 = 180.0;
pub const ROTATE_DEADZONE: f32 = 0.01;
/// Above this deflection on either axis, input counts as full and skips repositioning.
pub const SOFT_INPUT_THRESHOLD: f32 = 0.9;
/// Jumps only launch while the animator speed is above this.
pub const IDLE_JUMP_SPEED: f32 = 0.1;
/// Contacts whose normal has a vertical component at or below this are walls.
pub const WALL_NORMAL_CUTOFF: f32 = 0.1;
pub const GRIP_FRICTION: f32 = 0.6;
pub const TURN_SMOOTHING: f32 = 0.06;

/// Construction-time tuning of the move behaviour.
#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MoveConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub sprint_speed: f32,
    pub speed_damp_time: f32,
    pub jump_height: f32,
    pub jump_inertial_force: f32,
    pub anim_speed: f32,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            run_speed: RUN_SPEED,
            sprint_speed: SPRINT_SPEED,
            speed_damp_time: SPEED_DAMP_TIME,
            jump_height: JUMP_HEIGHT,
            jump_inertial_force: JUMP_INERTIAL_FORCE,
            anim_speed: ANIM_SPEED,
        }
    }
}

impl MoveConfig {
    pub fn with_jump_height(mut self, jump_height: f32) -> Self {
        self.jump_height = jump_height;
        self
    }

    /// Clamp a speed ceiling into the walk/run band. The band is ordered
    /// first, so a loaded config with swapped speeds still clamps.
    pub fn clamp_seeker(&self, speed_seeker: f32) -> f32 {
        let low = self.walk_speed.min(self.run_speed);
        let high = self.walk_speed.max(self.run_speed);
        speed_seeker.max(low).min(high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_constants() {
        let config = MoveConfig::default();
        assert_eq!(config.walk_speed, WALK_SPEED);
        assert_eq!(config.run_speed, RUN_SPEED);
        assert_eq!(config.sprint_speed, SPRINT_SPEED);
        assert_eq!(config.jump_height, JUMP_HEIGHT);
    }

    #[test]
    fn clamp_seeker_stays_in_band() {
        let config = MoveConfig::default();
        assert_eq!(config.clamp_seeker(100.0), config.run_speed);
        assert_eq!(config.clamp_seeker(-100.0), config.walk_speed);
        assert_eq!(config.clamp_seeker(0.75), 0.75);
    }

    #[test]
    fn clamp_seeker_tolerates_swapped_band() {
        let config = MoveConfig {
            walk_speed: 1.0,
            run_speed: 0.5,
            ..MoveConfig::default()
        };
        assert_eq!(config.clamp_seeker(100.0), 1.0);
        assert_eq!(config.clamp_seeker(-100.0), 0.5);
        assert_eq!(config.clamp_seeker(0.75), 0.75);
    }
}
