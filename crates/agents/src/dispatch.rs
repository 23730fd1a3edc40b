//! Shared plumbing between agent adapters and the character: decision
//! buffers, the keyboard heuristic, episode resets, and the single call that
//! hands a decoded decision to the controller.

use avian3d::prelude::{AngularVelocity, LinearVelocity};
use bevy::log::debug;
use bevy::prelude::*;
use controller::behaviour::BehaviourManager;
use controller::inputs::action_source::{ActionError, ActionSource, DiscreteActionVector};

/// Branches in the reduced agent action space: `[forward, rotate]`.
pub const AGENT_ACTION_BRANCHES: usize = 2;

/// The next decision for an agent, written by a trainer, a scripted policy,
/// or the heuristic. Taken once by the adapter system.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct AgentDecision {
    pending: Option<Vec<i32>>,
}

impl AgentDecision {
    pub fn submit(&mut self, actions: &[i32]) {
        self.pending = Some(actions.to_vec());
    }

    pub fn take(&mut self) -> Option<Vec<i32>> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Fill empty decisions from the keyboard.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct HeuristicControl;

/// Request an episode reset on the next physics tick.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct EpisodeBegin;

/// Map `[forward, rotate]` onto the four-slot vector. Agent rotate 1 is a left
/// turn and 2 a right turn; the controller reads slot value 1 as right, so
/// the two are swapped. Strafe and jump stay 0.
pub fn map_agent_actions(actions: &[i32]) -> Result<DiscreteActionVector, ActionError> {
    let [forward, rotate, ..] = actions else {
        return Err(ActionError::WrongArity {
            expected: AGENT_ACTION_BRANCHES,
            actual: actions.len(),
        });
    };

    let forward = if *forward == 1 { 1 } else { 0 };
    let rotate = match *rotate {
        1 => 2,
        2 => 1,
        _ => 0,
    };
    DiscreteActionVector::new(forward, 0, rotate, 0)
}

/// W moves forward; A turns left and wins over D.
pub fn heuristic_actions(keys: &ButtonInput<KeyCode>) -> [i32; AGENT_ACTION_BRANCHES] {
    let forward = i32::from(keys.pressed(KeyCode::KeyW));
    let rotate = if keys.pressed(KeyCode::KeyA) {
        1
    } else if keys.pressed(KeyCode::KeyD) {
        2
    } else {
        0
    };
    [forward, rotate]
}

/// Switch the host to policy mode and hand the vector to every consumer in
/// one step, so no tick can observe a half-applied decision.
pub fn dispatch_policy_actions(
    vector: DiscreteActionVector,
    host: &mut BehaviourManager,
    source: &mut ActionSource,
) {
    host.set_policy_mode(true);
    host.set_axes(vector.decode().planar());
    source.push_discrete_actions(vector);
}

/// Stop the body and start the episode under policy control.
pub fn begin_episode(
    velocity: &mut LinearVelocity,
    angular_velocity: Option<&mut AngularVelocity>,
    host: &mut BehaviourManager,
    source: &mut ActionSource,
) {
    velocity.0 = Vec3::ZERO;
    if let Some(angular_velocity) = angular_velocity {
        angular_velocity.0 = Vec3::ZERO;
    }
    host.set_axes(Vec2::ZERO);
    host.set_policy_mode(true);
    source.reset();
}

pub fn begin_agent_episodes(
    mut commands: Commands,
    mut agents: Query<
        (
            Entity,
            &mut LinearVelocity,
            Option<&mut AngularVelocity>,
            &mut BehaviourManager,
            &mut ActionSource,
            &mut AgentDecision,
        ),
        With<EpisodeBegin>,
    >,
) {
    for (entity, mut velocity, mut angular_velocity, mut host, mut source, mut decision) in
        agents.iter_mut()
    {
        begin_episode(
            &mut velocity,
            angular_velocity.as_deref_mut(),
            &mut host,
            &mut source,
        );
        decision.take();
        commands.entity(entity).remove::<EpisodeBegin>();
        debug!("episode begins for {entity}");
    }
}

pub fn heuristic_decisions(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut agents: Query<&mut AgentDecision, With<HeuristicControl>>,
) {
    let Some(keys) = keys else {
        return;
    };
    let actions = heuristic_actions(&keys);
    for mut decision in agents.iter_mut() {
        if !decision.is_pending() {
            decision.submit(&actions);
        }
    }
}
