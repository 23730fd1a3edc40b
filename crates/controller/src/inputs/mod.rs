use bevy::prelude::{Plugin, Query, Update, Vec2};
use leafwing_input_manager::prelude::ActionState;

use crate::behaviour::BehaviourManager;
use crate::inputs::action_source::ActionSource;
use crate::inputs::input::MoveAction;
use crate::locomotion::LocomotionState;

pub mod action_source;
pub mod input;

const MOVEMENT_DEADZONE_SQUARED: f32 = 0.000001;
/// Speed-seeker change per scroll line.
pub const SCROLL_SENSITIVITY: f32 = 0.1;

pub struct ControllerInputPlugin;

impl Plugin for ControllerInputPlugin {
    fn build(&self, app: &mut bevy::prelude::App) {
        // Button edges are only visible on the frame tick.
        app.add_systems(Update, sample_human_input);
    }
}

pub fn get_movement_axes(action_state: &ActionState<MoveAction>) -> Vec2 {
    let move_input = action_state.axis_pair(&MoveAction::Move);
    if move_input.length_squared() < MOVEMENT_DEADZONE_SQUARED {
        Vec2::ZERO
    } else {
        move_input.clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

/// Frame tick: copy human axes into the action source and the host, and
/// latch a jump on button-down.
pub fn sample_human_input(
    mut query: Query<(
        &ActionState<MoveAction>,
        &mut ActionSource,
        &mut BehaviourManager,
        &LocomotionState,
    )>,
) {
    for (action_state, mut source, mut host, state) in query.iter_mut() {
        if host.is_policy_mode() || action_state.disabled() {
            continue;
        }

        let axes = get_movement_axes(action_state);
        source.set_human_axes(axes);
        source.add_scroll(action_state.value(&MoveAction::SpeedScroll) * SCROLL_SENSITIVITY);
        host.set_axes(axes);
        host.set_sprint_input(action_state.pressed(&MoveAction::Sprint));

        if action_state.just_pressed(&MoveAction::Jump)
            && !state.is_jumping()
            && host.is_current_behaviour(state.behaviour)
            && !host.is_overriding()
        {
            source.latch_jump();
        }
    }
}
