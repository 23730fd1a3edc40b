use avian3d::prelude::{Collisions, LinearVelocity, Mass, Position};
use bevy::log::{debug, warn};
use bevy::prelude::*;
use controller::behaviour::BehaviourManager;
use controller::inputs::action_source::{ActionError, ActionSource, DiscreteActionVector};
use serde::{Deserialize, Serialize};

use crate::dispatch::{AgentDecision, dispatch_policy_actions, map_agent_actions};

/// Force of a full-power kick.
pub const KICK_POWER: f32 = 2000.0;
/// Distance from the spawn point to a team's starting spot along x.
pub const TEAM_SPAWN_OFFSET: f32 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Blue,
    Purple,
}

impl Team {
    /// Blue starts on the negative x side, purple on the positive.
    pub fn initial_position(self, spawn: Vec3) -> Vec3 {
        let offset = match self {
            Self::Blue => -TEAM_SPAWN_OFFSET,
            Self::Purple => TEAM_SPAWN_OFFSET,
        };
        Vec3::new(spawn.x + offset, 0.5, spawn.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PlayerPosition {
    Striker,
    Goalie,
    #[default]
    Generic,
}

#[derive(Component, Clone, Debug, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct SoccerAgent {
    pub team: Team,
    pub position: PlayerPosition,
    /// 1.0 while the last decision moved forward, else 0.0.
    pub kick_power: f32,
    pub touching_ball: bool,
    pub kicks: u32,
}

impl SoccerAgent {
    pub fn new(team: Team, position: PlayerPosition) -> Self {
        Self {
            team,
            position,
            kick_power: 0.0,
            touching_ball: false,
            kicks: 0,
        }
    }

    /// Record this tick's ball contact; true only on the tick contact starts.
    pub fn touch_started(&mut self, touching: bool) -> bool {
        let was_touching = std::mem::replace(&mut self.touching_ball, touching);
        touching && !was_touching
    }

    /// Goalies always kick at full power.
    pub fn kick_force(&self) -> f32 {
        match self.position {
            PlayerPosition::Goalie => KICK_POWER,
            _ => KICK_POWER * self.kick_power,
        }
    }
}

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Ball;

/// Canonical vector plus the kick power implied by the decision.
pub fn soccer_actions(actions: &[i32]) -> Result<(DiscreteActionVector, f32), ActionError> {
    let vector = map_agent_actions(actions)?;
    let kick_power = if vector.forward == 1 { 1.0 } else { 0.0 };
    Ok((vector, kick_power))
}

/// Force on the ball, pushed away from the kicker.
pub fn kick_impulse(kicker: Vec3, contact: Vec3, force: f32) -> Vec3 {
    (contact - kicker).normalize_or_zero() * force
}

/// Velocity change from holding `force` for one step of `dt` on `mass`.
pub fn velocity_change(force: Vec3, mass: f32, dt: f32) -> Vec3 {
    if mass <= 0.0 {
        return Vec3::ZERO;
    }
    force / mass * dt
}

pub fn apply_soccer_decisions(
    mut agents: Query<(
        Entity,
        &mut SoccerAgent,
        &mut AgentDecision,
        &mut BehaviourManager,
        &mut ActionSource,
    )>,
) {
    for (entity, mut agent, mut decision, mut host, mut source) in agents.iter_mut() {
        let Some(raw) = decision.take() else {
            continue;
        };
        agent.kick_power = 0.0;
        match soccer_actions(&raw) {
            Ok((vector, kick_power)) => {
                agent.kick_power = kick_power;
                dispatch_policy_actions(vector, &mut host, &mut source);
            }
            Err(err) => warn!("soccer agent {entity} sent an unusable decision: {err}"),
        }
    }
}

/// Kick the ball on first touch. Holding contact does not kick again.
pub fn soccer_ball_kicks(
    time: Res<Time<Fixed>>,
    collisions: Collisions,
    mut agents: Query<(Entity, &mut SoccerAgent, &Position)>,
    mut balls: Query<(&Position, &Mass, &mut LinearVelocity), With<Ball>>,
) {
    let dt = time.timestep().as_secs_f32();

    for (entity, mut agent, position) in agents.iter_mut() {
        let touched = collisions
            .collisions_with(entity)
            .filter(|pair| !pair.manifolds.is_empty())
            .map(|pair| {
                if pair.collider1 == entity {
                    pair.collider2
                } else {
                    pair.collider1
                }
            })
            .find(|other| balls.contains(*other));

        if !agent.touch_started(touched.is_some()) {
            continue;
        }
        let Some(ball) = touched else {
            continue;
        };
        let Ok((ball_position, mass, mut velocity)) = balls.get_mut(ball) else {
            continue;
        };

        let force = kick_impulse(position.0, ball_position.0, agent.kick_force());
        velocity.0 += velocity_change(force, mass.0, dt);
        agent.kicks += 1;
        debug!("{entity} kicked the ball with {:.0} N", agent.kick_force());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use controller::behaviour::MOVE_BEHAVIOUR;

    #[test]
    fn forward_decision_arms_the_kick() {
        let (vector, kick_power) = soccer_actions(&[1, 1]).unwrap();
        assert_eq!(vector.as_array(), [1, 0, 2, 0]);
        assert_eq!(kick_power, 1.0);

        let (_, kick_power) = soccer_actions(&[0, 2]).unwrap();
        assert_eq!(kick_power, 0.0);
    }

    #[test]
    fn goalie_always_kicks_at_full_power() {
        let goalie = SoccerAgent::new(Team::Purple, PlayerPosition::Goalie);
        assert_eq!(goalie.kick_force(), KICK_POWER);

        let mut striker = SoccerAgent::new(Team::Blue, PlayerPosition::Striker);
        assert_eq!(striker.kick_force(), 0.0);
        striker.kick_power = 1.0;
        assert_eq!(striker.kick_force(), KICK_POWER);
    }

    #[test]
    fn holding_contact_kicks_once() {
        let mut agent = SoccerAgent::new(Team::Blue, PlayerPosition::Striker);
        assert!(!agent.touch_started(false));
        assert!(agent.touch_started(true));
        assert!(!agent.touch_started(true), "held contact is not a new touch");
        assert!(!agent.touch_started(false));
        assert!(agent.touch_started(true), "touching again kicks again");
    }

    #[test]
    fn kick_points_from_kicker_to_contact() {
        let impulse = kick_impulse(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), 100.0);
        assert_eq!(impulse, Vec3::new(0.0, 0.0, -100.0));
        assert_eq!(kick_impulse(Vec3::ONE, Vec3::ONE, 100.0), Vec3::ZERO);
    }

    #[test]
    fn massless_ball_is_not_launched() {
        assert_eq!(velocity_change(Vec3::X * 10.0, 0.0, 0.1), Vec3::ZERO);
        assert_eq!(velocity_change(Vec3::X * 10.0, 2.0, 0.1), Vec3::X * 0.5);
    }

    #[test]
    fn teams_start_on_opposite_sides() {
        let spawn = Vec3::new(1.0, 3.0, 2.0);
        assert_eq!(Team::Blue.initial_position(spawn), Vec3::new(-4.0, 0.5, 2.0));
        assert_eq!(Team::Purple.initial_position(spawn), Vec3::new(6.0, 0.5, 2.0));
    }

    #[test]
    fn idle_decision_disarms_the_kick() {
        let mut app = App::new();
        let mut decision = AgentDecision::default();
        decision.submit(&[0, 0]);
        let mut agent = SoccerAgent::new(Team::Blue, PlayerPosition::Striker);
        agent.kick_power = 1.0;
        let entity = app
            .world_mut()
            .spawn((
                agent,
                decision,
                BehaviourManager::with_default(MOVE_BEHAVIOUR),
                ActionSource::default(),
            ))
            .id();

        app.world_mut()
            .run_system_once(apply_soccer_decisions)
            .unwrap();

        let world = app.world();
        assert_eq!(world.get::<SoccerAgent>(entity).unwrap().kick_power, 0.0);
        assert!(world.get::<BehaviourManager>(entity).unwrap().is_policy_mode());
        assert!(world.get::<ActionSource>(entity).unwrap().has_pending_actions());
    }
}
