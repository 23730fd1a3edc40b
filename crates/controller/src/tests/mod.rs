mod jump_tests;

use avian3d::prelude::{Friction, GravityScale, LinearVelocity, Rotation};
use bevy::prelude::{Vec2, Vec3};

use crate::animator::AnimatorParams;
use crate::behaviour::{BehaviourManager, MOVE_BEHAVIOUR};
use crate::config::{GRIP_FRICTION, MoveConfig};
use crate::inputs::action_source::ActionSource;
use crate::locomotion::{CharacterBody, LocomotionState, TickContext, TickOutcome, locomotion_tick};

/// A character assembled from plain values so ticks can run without an App.
pub(crate) struct Rig {
    pub ctx: TickContext,
    pub config: MoveConfig,
    pub state: LocomotionState,
    pub source: ActionSource,
    pub host: BehaviourManager,
    pub velocity: LinearVelocity,
    pub rotation: Rotation,
    pub gravity_scale: GravityScale,
    pub friction: Friction,
    pub animator: AnimatorParams,
}

impl Rig {
    pub fn grounded() -> Self {
        let config = MoveConfig::default();
        let mut host = BehaviourManager::with_default(MOVE_BEHAVIOUR);
        host.set_grounded(true);
        Self {
            ctx: TickContext::default(),
            state: LocomotionState::new(&config),
            config,
            source: ActionSource::default(),
            host,
            velocity: LinearVelocity::default(),
            rotation: Rotation::default(),
            gravity_scale: GravityScale(1.0),
            friction: Friction::new(GRIP_FRICTION),
            animator: AnimatorParams::default(),
        }
    }

    pub fn policy() -> Self {
        let mut rig = Self::grounded();
        rig.host.set_policy_mode(true);
        rig
    }

    /// Human forward input at full deflection.
    pub fn walking(speed: f32) -> Self {
        let mut rig = Self::grounded();
        rig.hold_axes(Vec2::new(0.0, 1.0));
        rig.animator.speed = speed;
        rig
    }

    pub fn hold_axes(&mut self, axes: Vec2) {
        self.source.set_human_axes(axes);
        self.host.set_axes(axes);
    }

    pub fn tick(&mut self) -> TickOutcome {
        let body = CharacterBody {
            velocity: &mut self.velocity,
            rotation: &mut self.rotation,
            gravity_scale: &mut self.gravity_scale,
            friction: Some(&mut self.friction),
        };
        locomotion_tick(
            &mut self.source,
            &self.ctx,
            &self.config,
            &mut self.state,
            &mut self.host,
            Some(body),
            Some(&mut self.animator),
        )
    }

    pub fn expected_launch(&self) -> f32 {
        (2.0 * self.ctx.gravity.y.abs() * self.config.jump_height).sqrt()
    }

    pub fn planar_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.0.x, 0.0, self.velocity.0.z)
    }
}
