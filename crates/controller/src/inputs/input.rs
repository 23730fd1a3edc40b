use bevy::prelude::{KeyCode, Reflect};
use leafwing_input_manager::Actionlike;
use leafwing_input_manager::prelude::{InputMap, MouseScrollAxis, VirtualDPad};
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Reflect, Serialize, Deserialize, Actionlike, Default,
)]
pub enum MoveAction {
    #[default]
    #[actionlike(DualAxis)]
    Move,

    #[actionlike(Button)]
    Jump,

    #[actionlike(Button)]
    Sprint,

    #[actionlike(Axis)]
    SpeedScroll,
}

pub fn get_move_input_map() -> InputMap<MoveAction> {
    InputMap::<MoveAction>::default()
        .with(MoveAction::Jump, KeyCode::Space)
        .with(MoveAction::Sprint, KeyCode::ShiftLeft)
        .with_dual_axis(MoveAction::Move, VirtualDPad::wasd())
        .with_dual_axis(MoveAction::Move, VirtualDPad::arrow_keys())
        .with_axis(MoveAction::SpeedScroll, MouseScrollAxis::Y)
}
