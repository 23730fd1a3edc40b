pub mod animator;
pub mod behaviour;
pub mod config;
pub mod contacts;
pub mod entities;
pub mod inputs;
pub mod jump;
pub mod locomotion;
pub mod movement;

#[cfg(test)]
mod tests;

use avian3d::prelude::PhysicsPlugins;
use bevy::prelude::{Fixed, FixedUpdate, IntoScheduleConfigs, Plugin, SystemSet, Time};

pub const FIXED_TIMESTEP_HZ: f64 = 60.0;

/// Ordering of the controller's physics-tick work. Agent decisions land in
/// `Decide` so the locomotion tick of the same step sees them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControllerSet {
    Sense,
    Decide,
    Locomotion,
    Animate,
}

pub struct ControllerPlugin;

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_TIMESTEP_HZ));
        app.add_plugins(PhysicsPlugins::default());
        app.add_plugins(inputs::ControllerInputPlugin);

        app.configure_sets(
            FixedUpdate,
            (
                ControllerSet::Sense,
                ControllerSet::Decide,
                ControllerSet::Locomotion,
                ControllerSet::Animate,
            )
                .chain(),
        );
        app.add_systems(
            FixedUpdate,
            (
                movement::update_ground_detection,
                contacts::track_surface_contacts,
            )
                .in_set(ControllerSet::Sense),
        );
        app.add_systems(
            FixedUpdate,
            locomotion::locomotion_system.in_set(ControllerSet::Locomotion),
        );
        app.add_systems(
            FixedUpdate,
            animator::apply_root_motion.in_set(ControllerSet::Animate),
        );
    }
}
