//! Animator parameter store and the root-motion stand-in that turns the
//! speed parameter into planar body motion.

use avian3d::prelude::{LinearVelocity, Rotation};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::behaviour::BehaviourManager;
use crate::locomotion::LocomotionState;
use crate::movement::forward_of;

/// Metres per second of root motion per unit of animator speed.
pub const ROOT_MOTION_SCALE: f32 = 4.0;

#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnimatorParams {
    pub speed: f32,
    pub jump: bool,
    pub grounded: bool,
    pub playback_speed: f32,
    pub root_motion_scale: f32,
}

impl Default for AnimatorParams {
    fn default() -> Self {
        Self {
            speed: 0.0,
            jump: false,
            grounded: true,
            playback_speed: 1.0,
            root_motion_scale: ROOT_MOTION_SCALE,
        }
    }
}

impl AnimatorParams {
    pub fn with_playback_speed(playback_speed: f32) -> Self {
        Self {
            playback_speed,
            ..default()
        }
    }

    /// Move the speed parameter toward `target` with damping instead of snapping.
    pub fn set_speed_damped(&mut self, target: f32, damp_time: f32, dt: f32) {
        self.speed = damp_towards(self.speed, target, damp_time, dt);
    }
}

/// First-order damper: covers `dt / (damp_time + dt)` of the remaining gap.
pub fn damp_towards(current: f32, target: f32, damp_time: f32, dt: f32) -> f32 {
    if damp_time <= 0.0 {
        return target;
    }
    if dt <= 0.0 {
        return current;
    }
    current + (target - current) * (dt / (damp_time + dt))
}

/// Planar velocity the animation would produce along `facing`. Playback
/// speed scales root motion along with the clip.
pub fn root_motion_velocity(animator: &AnimatorParams, facing: Vec3) -> Vec3 {
    facing * animator.speed * animator.root_motion_scale * animator.playback_speed
}

/// Drive the planar velocity from the animator speed while grounded or
/// mid-jump, adding the jump's carry-through for this tick. Free fall
/// outside a jump keeps its momentum.
pub fn apply_root_motion(
    mut query: Query<(
        &AnimatorParams,
        &BehaviourManager,
        &Rotation,
        &mut LinearVelocity,
        Option<&mut LocomotionState>,
    )>,
) {
    for (animator, host, rotation, mut velocity, state) in query.iter_mut() {
        if !animator.jump && !host.is_grounded() {
            continue;
        }
        let mut planar = root_motion_velocity(animator, forward_of(rotation.0));
        if let Some(mut state) = state {
            planar += std::mem::take(&mut state.jump_carry);
        }
        velocity.0.x = planar.x;
        velocity.0.z = planar.z;
    }
}
