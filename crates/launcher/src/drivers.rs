//! Stand-ins for the outside world: a seeded random policy for agents and a
//! scripted player for human mode.

use agents::dispatch::AGENT_ACTION_BRANCHES;
use agents::{AgentDecision, HeuristicControl};
use bevy::prelude::*;
use controller::ControllerSet;
use controller::inputs::input::MoveAction;
use controller::inputs::sample_human_input;
use leafwing_input_manager::prelude::ActionState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{InputMode, SimOptions};

/// Frames between scripted jump presses.
pub const SCRIPTED_JUMP_PERIOD: u32 = 90;

#[derive(Resource)]
pub struct PolicyRng(pub StdRng);

#[derive(Resource, Default, Debug)]
pub struct ScriptedHuman {
    pub frame: u32,
}

pub struct DriversPlugin;

impl Plugin for DriversPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_drivers);
        app.add_systems(
            FixedUpdate,
            random_policy_decisions
                .before(ControllerSet::Decide)
                .run_if(resource_exists::<PolicyRng>),
        );
        app.add_systems(
            Update,
            scripted_human_input
                .before(sample_human_input)
                .run_if(resource_exists::<ScriptedHuman>),
        );
    }
}

fn setup_drivers(mut commands: Commands, options: Res<SimOptions>) {
    match options.mode {
        InputMode::Human => commands.insert_resource(ScriptedHuman::default()),
        InputMode::Hallway | InputMode::Soccer if !options.external_policy => {
            commands.insert_resource(PolicyRng(StdRng::seed_from_u64(options.seed)));
        }
        _ => {}
    }
}

/// Uniform sample over `[forward, rotate]`.
pub fn random_agent_actions(rng: &mut impl Rng) -> [i32; AGENT_ACTION_BRANCHES] {
    [rng.random_range(0..2), rng.random_range(0..3)]
}

pub fn random_policy_decisions(
    mut rng: ResMut<PolicyRng>,
    mut agents: Query<&mut AgentDecision, Without<HeuristicControl>>,
) {
    for mut decision in agents.iter_mut() {
        if !decision.is_pending() {
            decision.submit(&random_agent_actions(&mut rng.0));
        }
    }
}

/// Hold forward and tap jump periodically.
pub fn scripted_human_input(
    mut script: ResMut<ScriptedHuman>,
    mut players: Query<&mut ActionState<MoveAction>>,
) {
    script.frame += 1;
    let jump = script.frame % SCRIPTED_JUMP_PERIOD == 0;

    for mut action_state in players.iter_mut() {
        action_state.set_axis_pair(&MoveAction::Move, Vec2::new(0.0, 1.0));
        if jump {
            action_state.press(&MoveAction::Jump);
        } else {
            action_state.release(&MoveAction::Jump);
        }
    }
}
