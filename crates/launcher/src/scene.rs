use agents::{AgentDecision, Ball, EpisodeBegin, HallwayAgent, PlayerPosition, SoccerAgent, Team};
use avian3d::prelude::*;
use bevy::prelude::*;
use controller::config::MoveConfig;
use controller::entities::{CHARACTER_CAPSULE_LENGTH, CHARACTER_CAPSULE_RADIUS, spawn_character};

use crate::{InputMode, SimOptions};

pub const FLOOR_SIZE: f32 = 40.0;
pub const FLOOR_THICKNESS: f32 = 1.0;
pub const BALL_RADIUS: f32 = 0.5;
pub const BALL_MASS: f32 = 1.0;

/// Height that rests the capsule just above the floor.
pub fn character_spawn_height() -> f32 {
    CHARACTER_CAPSULE_LENGTH * 0.5 + CHARACTER_CAPSULE_RADIUS + 0.05
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Floor;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SimCharacter;

pub fn spawn_scene(mut commands: Commands, options: Res<SimOptions>) {
    commands.spawn((
        Name::new("Floor"),
        Floor,
        RigidBody::Static,
        Collider::cuboid(FLOOR_SIZE, FLOOR_THICKNESS, FLOOR_SIZE),
        Position::from_xyz(0.0, -FLOOR_THICKNESS * 0.5, 0.0),
        Transform::from_xyz(0.0, -FLOOR_THICKNESS * 0.5, 0.0),
    ));

    let config = MoveConfig::default().with_jump_height(options.jump_height);
    let height = character_spawn_height();

    match options.mode {
        InputMode::Human => {
            let entity = spawn_character(
                &mut commands,
                "Player",
                Vec3::new(0.0, height, 0.0),
                config,
            );
            commands.entity(entity).insert(SimCharacter);
        }
        InputMode::Hallway => {
            let entity = spawn_character(
                &mut commands,
                "HallwayAgent",
                Vec3::new(0.0, height, 0.0),
                config,
            );
            commands.entity(entity).insert((
                SimCharacter,
                HallwayAgent::default(),
                AgentDecision::default(),
                EpisodeBegin,
            ));
        }
        InputMode::Soccer => {
            let team = Team::Blue;
            let start = team.initial_position(Vec3::ZERO).with_y(height);
            let entity = spawn_character(&mut commands, "Striker", start, config);
            commands.entity(entity).insert((
                SimCharacter,
                SoccerAgent::new(team, PlayerPosition::Striker),
                AgentDecision::default(),
                EpisodeBegin,
            ));

            let ball_start = start.with_y(BALL_RADIUS) + Vec3::NEG_Z * 3.0;
            commands.spawn((
                Name::new("Ball"),
                Ball,
                RigidBody::Dynamic,
                Collider::sphere(BALL_RADIUS),
                Mass(BALL_MASS),
                Position(ball_start),
                Transform::from_translation(ball_start),
            ));
        }
    }

    info!("scene ready in {:?} mode", options.mode);
}
