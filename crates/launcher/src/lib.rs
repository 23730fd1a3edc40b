use std::time::Duration;

use agents::AgentsPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::ValueEnum;
use controller::{ControllerPlugin, FIXED_TIMESTEP_HZ};
use leafwing_input_manager::prelude::InputManagerPlugin;

use controller::inputs::input::MoveAction;

pub mod drivers;
pub mod native;
pub mod scene;

/// Who drives the character.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum InputMode {
    /// Scripted keyboard-style input through the action map.
    #[default]
    Human,
    /// Hallway agent decisions.
    Hallway,
    /// Soccer striker decisions, with a ball in front.
    Soccer,
}

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimOptions {
    pub mode: InputMode,
    pub ticks: u32,
    pub jump_height: f32,
    pub seed: u64,
    /// Leave agent decisions to the caller instead of the random policy.
    pub external_policy: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            mode: InputMode::Human,
            ticks: 600,
            jump_height: controller::config::JUMP_HEIGHT,
            seed: 0,
            external_policy: false,
        }
    }
}

pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / FIXED_TIMESTEP_HZ)
}

/// Headless app: physics, the controller, the agent adapters and one scene.
pub fn create_sim_app(options: SimOptions) -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        // LogPlugin is left to the binary so tests can build several apps.
        bevy::state::app::StatesPlugin,
        bevy::diagnostic::DiagnosticsPlugin,
        bevy::asset::AssetPlugin::default(),
        bevy::scene::ScenePlugin,
        bevy::mesh::MeshPlugin,
        bevy::input::InputPlugin,
    ));
    app.add_plugins(InputManagerPlugin::<MoveAction>::default());
    app.add_plugins(ControllerPlugin);
    app.add_plugins(AgentsPlugin);

    app.insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration()));
    app.add_plugins(drivers::DriversPlugin);
    app.insert_resource(options);
    app.add_systems(Startup, scene::spawn_scene);
    app
}

/// Steps a sim app one frame at a time with a fixed clock.
pub struct SimStepper {
    pub app: App,
    pub frames: u32,
    initialized: bool,
}

impl SimStepper {
    pub fn new(options: SimOptions) -> Self {
        Self::from_app(create_sim_app(options))
    }

    pub fn from_app(app: App) -> Self {
        Self {
            app,
            frames: 0,
            initialized: false,
        }
    }

    pub fn step(&mut self) {
        if !self.initialized {
            self.app.finish();
            self.app.cleanup();
            self.initialized = true;
        }
        self.app.update();
        self.frames += 1;
    }

    pub fn step_n(&mut self, frames: u32) {
        for _ in 0..frames {
            self.step();
        }
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
