pub mod dispatch;
pub mod hallway;
pub mod soccer;

use bevy::prelude::*;
use controller::ControllerSet;

pub use dispatch::{AgentDecision, EpisodeBegin, HeuristicControl, dispatch_policy_actions};
pub use hallway::HallwayAgent;
pub use soccer::{Ball, PlayerPosition, SoccerAgent, Team};

/// Turns agent decisions into controller input ahead of each locomotion tick.
pub struct AgentsPlugin;

impl Plugin for AgentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                dispatch::begin_agent_episodes,
                dispatch::heuristic_decisions,
                hallway::apply_hallway_decisions,
                soccer::apply_soccer_decisions,
            )
                .chain()
                .in_set(ControllerSet::Decide),
        );
        app.add_systems(
            FixedUpdate,
            soccer::soccer_ball_kicks.after(ControllerSet::Locomotion),
        );
    }
}
