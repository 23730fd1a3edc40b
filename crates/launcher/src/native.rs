use avian3d::prelude::Position;
use bevy::log::LogPlugin;
use bevy::prelude::{Name, With, info};
use clap::Parser;
use controller::animator::AnimatorParams;
use controller::behaviour::BehaviourManager;
use controller::locomotion::LocomotionState;

use crate::scene::SimCharacter;
use crate::{InputMode, SimOptions, SimStepper};

/// Frames between progress lines.
const REPORT_EVERY: u32 = 60;

#[derive(Parser)]
#[command(name = "launcher")]
#[command(version = "0.1")]
#[command(about = "Headless character controller simulation")]
#[command(long_about = "
Headless character controller simulation

EXAMPLES:
    cargo run --bin launcher -- human                        # Scripted walk with periodic jumps
    cargo run --bin launcher -- hallway --ticks 1200         # Random hallway policy
    cargo run --bin launcher -- soccer --seed 7              # Random striker policy with a ball
    cargo run --bin launcher -- human --jump-height 3.0      # Higher jumps
")]
struct Cli {
    #[arg(value_enum, default_value_t = InputMode::Human)]
    mode: InputMode,

    #[arg(short, long, default_value_t = 600)]
    #[arg(help = "Physics ticks to simulate")]
    ticks: u32,

    #[arg(long, default_value_t = controller::config::JUMP_HEIGHT)]
    jump_height: f32,

    #[arg(long, default_value_t = 0)]
    #[arg(help = "Seed for the random policy")]
    seed: u64,
}

impl Cli {
    fn options(&self) -> SimOptions {
        SimOptions {
            mode: self.mode,
            ticks: self.ticks,
            jump_height: self.jump_height,
            seed: self.seed,
            external_policy: false,
        }
    }
}

pub fn run() {
    let cli = Cli::parse();
    let options = cli.options();
    let ticks = options.ticks;

    let mut app = crate::create_sim_app(options);
    app.add_plugins(LogPlugin::default());
    let mut stepper = SimStepper::from_app(app);

    for _ in 0..ticks {
        stepper.step();
        if stepper.frames % REPORT_EVERY == 0 {
            report(&mut stepper);
        }
    }
    info!("simulation finished after {} ticks", stepper.frames);
}

fn report(stepper: &mut SimStepper) {
    let frame = stepper.frames;
    let world = stepper.world_mut();
    let mut characters = world.query_filtered::<(
        &Name,
        &Position,
        &AnimatorParams,
        &LocomotionState,
        &BehaviourManager,
    ), With<SimCharacter>>();

    for (name, position, animator, state, host) in characters.iter(world) {
        info!(
            "[{frame}] {name}: pos=({:.2}, {:.2}, {:.2}) speed={:.2} jumping={} grounded={} policy={}",
            position.x,
            position.y,
            position.z,
            animator.speed,
            state.is_jumping(),
            host.is_grounded(),
            host.is_policy_mode()
        );
    }
}
