use bevy::log::warn;
use bevy::prelude::*;
use controller::behaviour::BehaviourManager;
use controller::inputs::action_source::{ActionError, ActionSource, DiscreteActionVector};

use crate::dispatch::{AgentDecision, dispatch_policy_actions, map_agent_actions};

/// Hallway navigator: walks forward and turns, never strafes or jumps.
#[derive(Component, Clone, Debug, Default, PartialEq, Eq)]
pub struct HallwayAgent {
    pub decisions: u64,
}

pub fn hallway_actions(actions: &[i32]) -> Result<DiscreteActionVector, ActionError> {
    map_agent_actions(actions)
}

pub fn apply_hallway_decisions(
    mut agents: Query<(
        Entity,
        &mut HallwayAgent,
        &mut AgentDecision,
        &mut BehaviourManager,
        &mut ActionSource,
    )>,
) {
    for (entity, mut agent, mut decision, mut host, mut source) in agents.iter_mut() {
        let Some(raw) = decision.take() else {
            continue;
        };
        match hallway_actions(&raw) {
            Ok(vector) => {
                dispatch_policy_actions(vector, &mut host, &mut source);
                agent.decisions += 1;
            }
            Err(err) => warn!("hallway agent {entity} sent an unusable decision: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use controller::behaviour::MOVE_BEHAVIOUR;

    #[test]
    fn forward_with_no_turn() {
        let vector = hallway_actions(&[1, 0]).unwrap();
        let command = vector.decode();
        assert_eq!(command.vertical, 1.0);
        assert_eq!(command.rotate, 0.0);
        assert_eq!(command.horizontal, 0.0);
        assert!(!command.jump_requested);
    }

    #[test]
    fn left_turn_decodes_negative() {
        let command = hallway_actions(&[0, 1]).unwrap().decode();
        assert_eq!(command.rotate, -1.0);
        assert_eq!(command.vertical, 0.0);
    }

    #[test]
    fn decision_is_dispatched_once() {
        let mut app = App::new();
        let mut decision = AgentDecision::default();
        decision.submit(&[1, 2]);
        let entity = app
            .world_mut()
            .spawn((
                HallwayAgent::default(),
                decision,
                BehaviourManager::with_default(MOVE_BEHAVIOUR),
                ActionSource::default(),
            ))
            .id();

        app.world_mut()
            .run_system_once(apply_hallway_decisions)
            .unwrap();
        app.world_mut()
            .run_system_once(apply_hallway_decisions)
            .unwrap();

        let world = app.world();
        assert_eq!(world.get::<HallwayAgent>(entity).unwrap().decisions, 1);
        assert!(world.get::<BehaviourManager>(entity).unwrap().is_policy_mode());
        let mut source = world.get::<ActionSource>(entity).unwrap().clone();
        let command = source.sample_command(true);
        assert_eq!(command.vertical, 1.0);
        assert_eq!(command.rotate, 1.0);
    }

    #[test]
    fn malformed_decision_leaves_character_alone() {
        let mut app = App::new();
        let mut decision = AgentDecision::default();
        decision.submit(&[1]);
        let entity = app
            .world_mut()
            .spawn((
                HallwayAgent::default(),
                decision,
                BehaviourManager::with_default(MOVE_BEHAVIOUR),
                ActionSource::default(),
            ))
            .id();

        app.world_mut()
            .run_system_once(apply_hallway_decisions)
            .unwrap();

        let world = app.world();
        assert_eq!(world.get::<HallwayAgent>(entity).unwrap().decisions, 0);
        assert!(!world.get::<BehaviourManager>(entity).unwrap().is_policy_mode());
        assert!(!world.get::<ActionSource>(entity).unwrap().has_pending_actions());
    }
}
