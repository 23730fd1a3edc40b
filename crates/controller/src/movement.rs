//! Ground detection and the movement half of the locomotion tick:
//! gravity gating, facing, and speed.

use avian3d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::animator::AnimatorParams;
use crate::behaviour::BehaviourManager;
use crate::config::{MoveConfig, POLICY_TURN_RATE_DEGREES, ROTATE_DEADZONE, SOFT_INPUT_THRESHOLD};
use crate::inputs::action_source::CanonicalCommand;
use crate::locomotion::{CharacterBody, LocomotionState, TickContext};

pub const TRACTION_NORMAL_CUTOFF: f32 = 0.7;
pub const GROUNDED_DISTANCE: f32 = 0.1;
const GROUND_PROBE_DISTANCE: f32 = 2.0;

#[derive(Component, Reflect, Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct GroundState {
    pub is_grounded: bool,
}

pub fn detect_ground(
    entity: Entity,
    collider: &Collider,
    position: Vec3,
    rotation: Quat,
    spatial_query: &SpatialQueryPipeline,
) -> GroundState {
    let filter = SpatialQueryFilter::default().with_excluded_entities([entity]);

    if let Some(hit) = spatial_query.cast_shape(
        collider,
        position,
        rotation,
        -Dir3::Y,
        &ShapeCastConfig::from_max_distance(GROUND_PROBE_DISTANCE),
        &filter,
    ) {
        let has_traction = Vec3::dot(hit.normal1, Vec3::Y) > TRACTION_NORMAL_CUTOFF;
        let is_grounded = hit.distance <= GROUNDED_DISTANCE;

        GroundState {
            is_grounded: is_grounded && has_traction,
        }
    } else {
        GroundState::default()
    }
}

/// Physics tick: refresh ground state and feed it to the host and animator.
pub fn update_ground_detection(
    spatial_query: Res<SpatialQueryPipeline>,
    mut query: Query<(
        Entity,
        &Position,
        &Rotation,
        &Collider,
        &mut GroundState,
        Option<&mut BehaviourManager>,
        Option<&mut AnimatorParams>,
    )>,
) {
    for (entity, position, rotation, collider, mut ground_state, host, animator) in query.iter_mut()
    {
        let detected = detect_ground(entity, collider, position.0, rotation.0, &spatial_query);

        ground_state.is_grounded = detected.is_grounded;

        if let Some(mut host) = host {
            host.set_grounded(detected.is_grounded);
        }
        if let Some(mut animator) = animator {
            animator.grounded = detected.is_grounded;
        }
    }
}

/// The body's facing direction (local -Z).
pub fn forward_of(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_Z
}

/// World-space planar direction for strafe/forward axes. Forward is -Z.
pub fn movement_direction(horizontal: f32, vertical: f32) -> Vec3 {
    Vec3::new(horizontal, 0.0, -vertical).normalize_or_zero()
}

/// Yaw-only rotation whose forward points along `direction`.
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z).try_normalize()?;
    Some(Quat::from_rotation_y(f32::atan2(-planar.x, -planar.z)))
}

/// Per-tick yaw delta for a policy rotate signal; positive turns right.
pub fn policy_yaw(rotate: f32, dt: f32) -> Option<Quat> {
    (rotate.abs() > ROTATE_DEADZONE)
        .then(|| Quat::from_rotation_y(-rotate * POLICY_TURN_RATE_DEGREES.to_radians() * dt))
}

/// Neither axis near full deflection.
pub fn is_soft_input(horizontal: f32, vertical: f32) -> bool {
    !(horizontal.abs() > SOFT_INPUT_THRESHOLD || vertical.abs() > SOFT_INPUT_THRESHOLD)
}

pub fn planar_speed(command: &CanonicalCommand, speed_seeker: f32) -> f32 {
    command.planar().clamp_length_max(1.0).length() * speed_seeker
}

/// Enable gravity on the ground; in the air outside a jump, drop upward drift.
pub fn gate_gravity(
    grounded: bool,
    jumping: bool,
    velocity: &mut LinearVelocity,
    gravity_scale: &mut GravityScale,
) {
    if grounded {
        gravity_scale.0 = 1.0;
    } else if !jumping && velocity.0.y > 0.0 {
        velocity.0.y = 0.0;
    }
}

/// Face the movement direction instantly while moving, and nudge the
/// heading when input is soft.
pub fn rotate_towards_movement(
    horizontal: f32,
    vertical: f32,
    host: &mut BehaviourManager,
    rotation: &mut Rotation,
) -> Vec3 {
    let direction = movement_direction(horizontal, vertical);

    if host.is_moving() && direction != Vec3::ZERO {
        if let Some(target) = facing_rotation(direction) {
            rotation.0 = target;
        }
        host.set_last_direction(direction);
    }

    if is_soft_input(horizontal, vertical) {
        host.repositioning(&mut rotation.0);
    }

    direction
}

pub fn movement_management(
    command: &CanonicalCommand,
    speed_scroll: Option<f32>,
    ctx: &TickContext,
    config: &MoveConfig,
    state: &mut LocomotionState,
    host: &mut BehaviourManager,
    body: &mut CharacterBody,
    animator: &mut AnimatorParams,
) {
    gate_gravity(
        host.is_grounded(),
        animator.jump,
        body.velocity,
        body.gravity_scale,
    );

    if host.is_policy_mode() {
        if let Some(delta) = policy_yaw(command.rotate, ctx.dt) {
            body.rotation.0 = (body.rotation.0 * delta).normalize();
        }
    } else {
        rotate_towards_movement(command.horizontal, command.vertical, host, body.rotation);
    }

    if let Some(scroll) = speed_scroll {
        state.speed_seeker = config.clamp_seeker(state.speed_seeker + scroll);
    }

    let mut speed = planar_speed(command, state.speed_seeker);
    if host.is_sprinting() {
        speed = config.sprint_speed;
    }
    state.speed = speed;

    animator.set_speed_damped(speed, config.speed_damp_time, ctx.dt);
}
