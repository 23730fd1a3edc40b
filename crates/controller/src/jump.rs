//! Jump state machine.
//!
//! `Grounded`/`Airborne` follow the ground probe. A launch moves to
//! `JumpLocked`, which owns the host's temporary lock until landing; the
//! lock is released when the phase is replaced. Forward carry-through is a
//! per-tick boost that root motion re-bases, so it never accumulates.

use bevy::log::debug;
use bevy::prelude::{Vec3, Vec3Swizzles};

use crate::animator::AnimatorParams;
use crate::behaviour::{BehaviourManager, TempLock};
use crate::config::{GRIP_FRICTION, IDLE_JUMP_SPEED, MoveConfig};
use crate::contacts::set_friction;
use crate::locomotion::{CharacterBody, LocomotionState, TickContext};
use crate::movement::forward_of;

#[derive(Debug, Default)]
pub enum JumpPhase {
    #[default]
    Grounded,
    Airborne,
    JumpLocked(TempLock),
}

impl JumpPhase {
    pub fn is_jump_locked(&self) -> bool {
        matches!(self, Self::JumpLocked(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpEvent {
    TookOff,
    Landed,
    /// A request that failed the launch gate was discarded.
    Suppressed,
}

/// Launch speed that peaks at exactly `jump_height` under `gravity`.
pub fn jump_impulse(gravity: f32, jump_height: f32) -> f32 {
    (2.0 * gravity.abs() * jump_height).sqrt()
}

/// Forward acceleration carried through the jump arc.
pub fn inertial_acceleration(config: &MoveConfig, gravity: Vec3, facing: Vec3) -> Vec3 {
    facing * (config.jump_inertial_force * gravity.length() * config.sprint_speed)
}

/// Landing needs a strictly falling body that touches ground.
pub fn has_landed(vertical_velocity: f32, grounded: bool) -> bool {
    vertical_velocity < 0.0 && grounded
}

pub fn jump_management(
    ctx: &TickContext,
    config: &MoveConfig,
    state: &mut LocomotionState,
    host: &BehaviourManager,
    body: &mut CharacterBody,
    animator: &mut AnimatorParams,
) -> Option<JumpEvent> {
    if !state.phase.is_jump_locked() {
        state.phase = if host.is_grounded() {
            JumpPhase::Grounded
        } else {
            JumpPhase::Airborne
        };
    }

    state.jump_carry = Vec3::ZERO;

    // A request lives for one tick; one that cannot launch now is discarded.
    let requested = std::mem::take(&mut state.jump_requested);
    if requested && !animator.jump && !state.phase.is_jump_locked() && host.is_grounded() {
        return take_off(ctx, config, state, host, body, animator);
    }

    if !state.phase.is_jump_locked() {
        return None;
    }

    if !host.is_grounded() && !state.is_colliding && host.temp_lock_status() {
        let facing = forward_of(body.rotation.0);
        let carry = inertial_acceleration(config, ctx.gravity, facing) * ctx.dt;
        body.velocity.0 += carry;
        state.jump_carry = carry;
    }

    if has_landed(body.velocity.0.y, host.is_grounded()) {
        animator.grounded = true;
        set_friction(body.friction.as_deref_mut(), GRIP_FRICTION);
        animator.jump = false;
        // Replacing the phase drops the lock guard.
        state.phase = JumpPhase::Grounded;
        debug!("landed at planar speed {:.2}", body.velocity.0.xz().length());
        return Some(JumpEvent::Landed);
    }

    None
}

fn take_off(
    ctx: &TickContext,
    config: &MoveConfig,
    state: &mut LocomotionState,
    host: &BehaviourManager,
    body: &mut CharacterBody,
    animator: &mut AnimatorParams,
) -> Option<JumpEvent> {
    if animator.speed <= IDLE_JUMP_SPEED {
        debug!("jump suppressed: animator speed {:.3} is idle", animator.speed);
        return Some(JumpEvent::Suppressed);
    }
    let Some(lock) = host.lock_temp_behaviour(state.behaviour) else {
        return Some(JumpEvent::Suppressed);
    };

    animator.jump = true;
    set_friction(body.friction.as_deref_mut(), 0.0);
    body.velocity.0.y = 0.0;
    let launch = jump_impulse(ctx.gravity.y, config.jump_height);
    body.velocity.0.y += launch;
    state.phase = JumpPhase::JumpLocked(lock);

    debug!("jump took off at {:.3} m/s", launch);
    Some(JumpEvent::TookOff)
}
