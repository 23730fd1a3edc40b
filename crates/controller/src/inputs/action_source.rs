//! Normalises human axes and policy action vectors into one per-tick command.

use bevy::log::debug;
use bevy::prelude::{Component, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DISCRETE_ACTION_SLOTS: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("discrete action vector needs at least {expected} slots, got {actual}")]
    WrongArity { expected: usize, actual: usize },
    #[error("slot {slot} holds {value}, expected 0..={max}")]
    OutOfRange { slot: usize, value: i32, max: i32 },
}

/// `[forward, strafe, rotate, jump]` as chosen by a policy for one decision step.
///
/// forward/strafe/rotate: 0 = none, 1 = positive, 2 = negative. jump: 0 or 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteActionVector {
    pub forward: i32,
    pub strafe: i32,
    pub rotate: i32,
    pub jump: i32,
}

impl DiscreteActionVector {
    pub const IDLE: Self = Self {
        forward: 0,
        strafe: 0,
        rotate: 0,
        jump: 0,
    };

    /// Range-checked constructor.
    pub fn new(forward: i32, strafe: i32, rotate: i32, jump: i32) -> Result<Self, ActionError> {
        let slots = [(forward, 2), (strafe, 2), (rotate, 2), (jump, 1)];
        for (slot, (value, max)) in slots.into_iter().enumerate() {
            if !(0..=max).contains(&value) {
                return Err(ActionError::OutOfRange { slot, value, max });
            }
        }
        Ok(Self {
            forward,
            strafe,
            rotate,
            jump,
        })
    }

    pub fn as_array(&self) -> [i32; DISCRETE_ACTION_SLOTS] {
        [self.forward, self.strafe, self.rotate, self.jump]
    }

    /// Decode into the canonical command. Unknown slot values decode as 0.
    pub fn decode(&self) -> CanonicalCommand {
        CanonicalCommand {
            horizontal: tri_state(self.strafe),
            vertical: tri_state(self.forward),
            rotate: tri_state(self.rotate),
            jump_requested: self.jump == 1,
        }
    }
}

/// Only the arity is checked; extra slots are ignored.
impl TryFrom<&[i32]> for DiscreteActionVector {
    type Error = ActionError;

    fn try_from(actions: &[i32]) -> Result<Self, Self::Error> {
        match actions {
            [forward, strafe, rotate, jump, ..] => Ok(Self {
                forward: *forward,
                strafe: *strafe,
                rotate: *rotate,
                jump: *jump,
            }),
            _ => Err(ActionError::WrongArity {
                expected: DISCRETE_ACTION_SLOTS,
                actual: actions.len(),
            }),
        }
    }
}

fn tri_state(slot: i32) -> f32 {
    match slot {
        1 => 1.0,
        2 => -1.0,
        _ => 0.0,
    }
}

/// Movement, rotation and jump intent for a single physics tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanonicalCommand {
    pub horizontal: f32,
    pub vertical: f32,
    pub rotate: f32,
    pub jump_requested: bool,
}

impl CanonicalCommand {
    pub const ZERO: Self = Self {
        horizontal: 0.0,
        vertical: 0.0,
        rotate: 0.0,
        jump_requested: false,
    };

    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.horizontal, self.vertical)
    }
}

/// Continuous input gathered on the frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HumanInput {
    pub axes: Vec2,
    /// Scroll accumulated since the last physics tick.
    pub scroll: f32,
    /// Jump button went down since the last physics tick.
    pub jump_latched: bool,
}

impl HumanInput {
    pub fn command(&self) -> CanonicalCommand {
        let axes = self.axes.clamp(Vec2::NEG_ONE, Vec2::ONE);
        CanonicalCommand {
            horizontal: axes.x,
            vertical: axes.y,
            rotate: 0.0,
            jump_requested: self.jump_latched,
        }
    }
}

/// The input source chosen for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputSample {
    Human(HumanInput),
    Policy(Option<DiscreteActionVector>),
}

impl InputSample {
    pub fn command(&self) -> CanonicalCommand {
        match self {
            Self::Human(input) => input.command(),
            Self::Policy(Some(actions)) => actions.decode(),
            Self::Policy(None) => CanonicalCommand::ZERO,
        }
    }

    /// Speed-seeker adjustment; only human input carries one.
    pub fn speed_scroll(&self) -> Option<f32> {
        match self {
            Self::Human(input) => Some(input.scroll),
            Self::Policy(_) => None,
        }
    }

    pub fn is_policy(&self) -> bool {
        matches!(self, Self::Policy(_))
    }
}

/// Per-character input buffer. A pushed policy vector is taken exactly once.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct ActionSource {
    human: HumanInput,
    pending: Option<DiscreteActionVector>,
}

impl ActionSource {
    /// Store a raw policy action slice. Slices shorter than four slots are dropped.
    pub fn set_discrete_actions(&mut self, actions: &[i32]) {
        match DiscreteActionVector::try_from(actions) {
            Ok(vector) => self.push_discrete_actions(vector),
            Err(err) => debug!("dropping discrete actions: {err}"),
        }
    }

    pub fn push_discrete_actions(&mut self, vector: DiscreteActionVector) {
        self.pending = Some(vector);
    }

    pub fn has_pending_actions(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget pending actions and latched human input.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_human_axes(&mut self, axes: Vec2) {
        self.human.axes = axes;
    }

    pub fn add_scroll(&mut self, delta: f32) {
        self.human.scroll += delta;
    }

    pub fn latch_jump(&mut self) {
        self.human.jump_latched = true;
    }

    pub fn jump_latched(&self) -> bool {
        self.human.jump_latched
    }

    /// Pick this tick's source and consume its one-shot parts: the pending
    /// vector, the scroll accumulator and the jump latch.
    pub fn select(&mut self, policy_mode: bool) -> InputSample {
        let pending = self.pending.take();
        let human = HumanInput {
            axes: self.human.axes,
            scroll: std::mem::take(&mut self.human.scroll),
            jump_latched: std::mem::take(&mut self.human.jump_latched),
        };
        if policy_mode {
            InputSample::Policy(pending)
        } else {
            InputSample::Human(human)
        }
    }

    pub fn sample_command(&mut self, policy_mode: bool) -> CanonicalCommand {
        self.select(policy_mode).command()
    }
}
