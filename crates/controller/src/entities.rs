use avian3d::prelude::{
    AngularDamping, Collider, Friction, GravityScale, LinearDamping, LinearVelocity, LockedAxes,
    Mass, Position, Restitution, RigidBody, Rotation,
};
use bevy::prelude::{Bundle, Commands, Entity, Name, Transform, Vec3, info};
use leafwing_input_manager::prelude::{ActionState, InputMap};

use crate::animator::AnimatorParams;
use crate::behaviour::{BehaviourManager, MOVE_BEHAVIOUR};
use crate::config::{GRIP_FRICTION, MoveConfig};
use crate::inputs::action_source::ActionSource;
use crate::inputs::input::{MoveAction, get_move_input_map};
use crate::locomotion::LocomotionState;
use crate::movement::GroundState;

pub const CHARACTER_CAPSULE_RADIUS: f32 = 0.3;
pub const CHARACTER_CAPSULE_LENGTH: f32 = 1.2;

#[derive(Bundle)]
pub struct CharacterPhysicsBundle {
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub mass: Mass,
    pub restitution: Restitution,
    pub friction: Friction,
    pub gravity_scale: GravityScale,
    pub linear_damping: LinearDamping,
    pub angular_damping: AngularDamping,
    pub locked_axes: LockedAxes, // Prevent capsizing
}

impl Default for CharacterPhysicsBundle {
    fn default() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            collider: Collider::capsule(CHARACTER_CAPSULE_RADIUS, CHARACTER_CAPSULE_LENGTH),
            mass: Mass(70.0),
            restitution: Restitution::ZERO,
            friction: Friction::new(GRIP_FRICTION),
            gravity_scale: GravityScale(1.0),
            linear_damping: LinearDamping(0.5),
            angular_damping: AngularDamping(8.0),
            locked_axes: LockedAxes::ROTATION_LOCKED.unlock_rotation_y(),
        }
    }
}

/// Everything the move behaviour needs on one character.
#[derive(Bundle)]
pub struct CharacterBundle {
    pub name: Name,
    pub transform: Transform,
    pub position: Position,
    pub rotation: Rotation,
    pub velocity: LinearVelocity,
    pub physics: CharacterPhysicsBundle,
    pub config: MoveConfig,
    pub state: LocomotionState,
    pub animator: AnimatorParams,
    pub source: ActionSource,
    pub host: BehaviourManager,
    pub ground: GroundState,
    pub action_state: ActionState<MoveAction>,
    pub input_map: InputMap<MoveAction>,
}

impl CharacterBundle {
    pub fn new(name: impl Into<String>, position: Vec3, config: MoveConfig) -> Self {
        let animator = AnimatorParams::with_playback_speed(config.anim_speed);

        Self {
            name: Name::new(name.into()),
            transform: Transform::from_translation(position),
            position: Position(position),
            rotation: Rotation::default(),
            velocity: LinearVelocity::default(),
            physics: CharacterPhysicsBundle::default(),
            state: LocomotionState::new(&config),
            config,
            animator,
            source: ActionSource::default(),
            host: BehaviourManager::with_default(MOVE_BEHAVIOUR),
            ground: GroundState::default(),
            action_state: ActionState::default(),
            input_map: get_move_input_map(),
        }
    }
}

pub fn spawn_character(
    commands: &mut Commands,
    name: &str,
    position: Vec3,
    config: MoveConfig,
) -> Entity {
    let entity = commands
        .spawn(CharacterBundle::new(name, position, config))
        .id();
    info!("Spawned character {name} at {position:?} as {entity}");
    entity
}
