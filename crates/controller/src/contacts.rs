use avian3d::prelude::{Collisions, Friction};
use bevy::prelude::{Entity, Query};

use crate::behaviour::BehaviourManager;
use crate::config::{GRIP_FRICTION, WALL_NORMAL_CUTOFF};
use crate::locomotion::LocomotionState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceContact {
    pub touching: bool,
    /// At least one contact is a wall or steep slope rather than floor.
    pub steep: bool,
}

pub fn set_friction(friction: Option<&mut Friction>, coefficient: f32) {
    if let Some(friction) = friction {
        friction.dynamic_coefficient = coefficient;
        friction.static_coefficient = coefficient;
    }
}

/// Zero friction against walls so the capsule does not snag. Grip comes back
/// when the wall contact ends, even while the floor is still touched, and
/// when all contact ends.
pub fn apply_surface_contact(
    contact: SurfaceContact,
    is_current: bool,
    state: &mut LocomotionState,
    friction: Option<&mut Friction>,
) {
    let wall_ended = state.touching_wall && !contact.steep;
    let contact_ended = state.is_colliding && !contact.touching;
    state.is_colliding = contact.touching;
    state.touching_wall = contact.steep;

    if contact.steep {
        if is_current {
            set_friction(friction, 0.0);
        }
    } else if wall_ended || contact_ended {
        set_friction(friction, GRIP_FRICTION);
    }
}

pub fn surface_contact(collisions: &Collisions<'_>, entity: Entity) -> SurfaceContact {
    let mut contact = SurfaceContact::default();
    for pair in collisions.collisions_with(entity) {
        for manifold in &pair.manifolds {
            contact.touching = true;
            // Manifold normals point from the first collider to the second.
            let normal = if pair.collider1 == entity {
                -manifold.normal
            } else {
                manifold.normal
            };
            contact.steep |= normal.y <= WALL_NORMAL_CUTOFF;
        }
    }
    contact
}

pub fn track_surface_contacts(
    collisions: Collisions,
    mut query: Query<(
        Entity,
        &mut LocomotionState,
        &BehaviourManager,
        Option<&mut Friction>,
    )>,
) {
    for (entity, mut state, host, mut friction) in query.iter_mut() {
        let contact = surface_contact(&collisions, entity);
        let is_current = host.is_current_behaviour(state.behaviour);
        apply_surface_contact(contact, is_current, &mut state, friction.as_deref_mut());
    }
}
