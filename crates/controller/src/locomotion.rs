//! The per-physics-tick locomotion procedure: sample a command, then run
//! movement and jump management against the body and animator handles.

use avian3d::prelude::{Friction, Gravity, GravityScale, LinearVelocity, Rotation};
use bevy::log::{debug, warn};
use bevy::prelude::*;

use crate::animator::AnimatorParams;
use crate::behaviour::{BehaviourId, BehaviourManager, MOVE_BEHAVIOUR};
use crate::config::MoveConfig;
use crate::inputs::action_source::{ActionSource, CanonicalCommand};
use crate::jump::{JumpEvent, JumpPhase, jump_management};
use crate::movement::movement_management;

/// Mutable state of one character's move behaviour.
#[derive(Component, Debug)]
pub struct LocomotionState {
    pub behaviour: BehaviourId,
    pub speed: f32,
    /// Speed ceiling, adjustable by scroll in human mode.
    pub speed_seeker: f32,
    pub jump_requested: bool,
    pub is_colliding: bool,
    /// Last tick saw a wall or steep contact.
    pub touching_wall: bool,
    /// Planar velocity the jump carry-through adds on top of root motion
    /// this tick.
    pub jump_carry: Vec3,
    pub phase: JumpPhase,
}

impl LocomotionState {
    pub fn new(config: &MoveConfig) -> Self {
        Self {
            behaviour: MOVE_BEHAVIOUR,
            speed: 0.0,
            speed_seeker: config.run_speed,
            jump_requested: false,
            is_colliding: false,
            touching_wall: false,
            jump_carry: Vec3::ZERO,
            phase: JumpPhase::Grounded,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.phase.is_jump_locked()
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.phase, JumpPhase::Grounded)
    }
}

impl Default for LocomotionState {
    fn default() -> Self {
        Self::new(&MoveConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    pub dt: f32,
    pub gravity: Vec3,
}

impl Default for TickContext {
    fn default() -> Self {
        Self {
            dt: 1.0 / crate::FIXED_TIMESTEP_HZ as f32,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

/// Borrowed physics handles of a character. Friction is optional because
/// the collider may carry no material.
pub struct CharacterBody<'a> {
    pub velocity: &'a mut LinearVelocity,
    pub rotation: &'a mut Rotation,
    pub gravity_scale: &'a mut GravityScale,
    pub friction: Option<&'a mut Friction>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotDriving,
    MissingBody,
    MissingAnimator,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Applied {
        command: CanonicalCommand,
        jump: Option<JumpEvent>,
    },
    Skipped(SkipReason),
}

/// One physics tick of the move behaviour. Fails soft: when a handle is
/// missing or another behaviour owns the character, nothing is mutated
/// beyond consuming this tick's input.
pub fn locomotion_tick(
    source: &mut ActionSource,
    ctx: &TickContext,
    config: &MoveConfig,
    state: &mut LocomotionState,
    host: &mut BehaviourManager,
    body: Option<CharacterBody>,
    animator: Option<&mut AnimatorParams>,
) -> TickOutcome {
    let sample = source.select(host.is_policy_mode());
    let command = sample.command();

    if !host.may_drive(state.behaviour) {
        return TickOutcome::Skipped(SkipReason::NotDriving);
    }
    let Some(mut body) = body else {
        return TickOutcome::Skipped(SkipReason::MissingBody);
    };
    let Some(animator) = animator else {
        return TickOutcome::Skipped(SkipReason::MissingAnimator);
    };

    if command.jump_requested {
        state.jump_requested = true;
    }

    movement_management(
        &command,
        sample.speed_scroll(),
        ctx,
        config,
        state,
        host,
        &mut body,
        animator,
    );
    let jump = jump_management(ctx, config, state, host, &mut body, animator);

    TickOutcome::Applied { command, jump }
}

pub fn locomotion_system(
    time: Res<Time<Fixed>>,
    gravity: Res<Gravity>,
    mut query: Query<(
        Entity,
        &MoveConfig,
        &mut LocomotionState,
        &mut ActionSource,
        &mut BehaviourManager,
        Option<&mut LinearVelocity>,
        Option<&mut Rotation>,
        Option<&mut GravityScale>,
        Option<&mut Friction>,
        Option<&mut AnimatorParams>,
    )>,
) {
    let ctx = TickContext {
        dt: time.timestep().as_secs_f32(),
        gravity: gravity.0,
    };

    for (
        entity,
        config,
        mut state,
        mut source,
        mut host,
        velocity,
        rotation,
        gravity_scale,
        mut friction,
        mut animator,
    ) in query.iter_mut()
    {
        let body = match (velocity, rotation, gravity_scale) {
            (Some(velocity), Some(rotation), Some(gravity_scale)) => Some(CharacterBody {
                velocity: velocity.into_inner(),
                rotation: rotation.into_inner(),
                gravity_scale: gravity_scale.into_inner(),
                friction: friction.as_deref_mut(),
            }),
            _ => None,
        };

        let outcome = locomotion_tick(
            &mut source,
            &ctx,
            config,
            &mut state,
            &mut host,
            body,
            animator.as_deref_mut(),
        );

        match outcome {
            TickOutcome::Skipped(SkipReason::NotDriving) => {}
            TickOutcome::Skipped(reason) => {
                warn!("locomotion skipped for {entity}: {reason:?}");
            }
            TickOutcome::Applied {
                jump: Some(event), ..
            } => debug!("{entity} jump event {event:?}"),
            TickOutcome::Applied { .. } => {}
        }
    }
}
