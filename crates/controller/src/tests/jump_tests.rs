#[cfg(test)]
mod jump_state_tests {
    use crate::behaviour::BehaviourId;
    use crate::config::GRIP_FRICTION;
    use crate::jump::{JumpEvent, JumpPhase};
    use crate::locomotion::TickOutcome;
    use crate::tests::Rig;
    use bevy::prelude::{Vec2, Vec3};

    fn jump_event(outcome: TickOutcome) -> Option<JumpEvent> {
        match outcome {
            TickOutcome::Applied { jump, .. } => jump,
            TickOutcome::Skipped(reason) => panic!("tick skipped: {reason:?}"),
        }
    }

    /// Human forward input, grounded, animator at 0.5, jump pressed
    #[test]
    fn test_human_jump_from_walk_launches() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();

        let event = jump_event(rig.tick());

        assert_eq!(event, Some(JumpEvent::TookOff));
        assert!(rig.state.phase.is_jump_locked());
        assert_eq!(
            rig.velocity.0.y,
            (2.0f32 * 9.81 * rig.config.jump_height).sqrt(),
            "launch speed must follow the projectile formula"
        );
        assert_eq!(rig.friction.dynamic_coefficient, 0.0);
        assert_eq!(rig.friction.static_coefficient, 0.0);
        assert!(rig.animator.jump);
        assert!(rig.host.temp_lock_status());
    }

    #[test]
    fn test_launch_discards_existing_vertical_velocity() {
        let mut rig = Rig::walking(0.5);
        rig.velocity.0.y = -4.0;
        rig.source.latch_jump();

        rig.tick();
        assert_eq!(rig.velocity.0.y, rig.expected_launch());
    }

    #[test]
    fn test_launch_speed_scales_with_height() {
        for height in [0.25, 1.0, 3.0] {
            let mut rig = Rig::walking(0.5);
            rig.config.jump_height = height;
            rig.source.latch_jump();
            rig.tick();
            assert_eq!(rig.velocity.0.y, rig.expected_launch(), "height {height}");
        }
    }

    /// Jumping from a dead stop is suppressed
    #[test]
    fn test_idle_jump_is_suppressed() {
        let mut rig = Rig::grounded();
        rig.animator.speed = 0.1;
        rig.source.latch_jump();

        let event = jump_event(rig.tick());

        assert_eq!(event, Some(JumpEvent::Suppressed));
        assert!(!rig.state.phase.is_jump_locked());
        assert_eq!(rig.velocity.0.y, 0.0);
        assert!(!rig.animator.jump);
        assert!(!rig.host.temp_lock_status(), "suppressed jump must not hold the lock");
        assert_eq!(rig.friction.dynamic_coefficient, GRIP_FRICTION);
    }

    #[test]
    fn test_suppressed_request_is_not_kept_for_later() {
        let mut rig = Rig::grounded();
        rig.source.latch_jump();
        rig.tick();

        rig.hold_axes(Vec2::new(0.0, 1.0));
        rig.animator.speed = 0.8;
        let event = jump_event(rig.tick());
        assert_eq!(event, None, "a discarded request must not fire once moving");
    }

    #[test]
    fn test_airborne_request_does_not_launch() {
        let mut rig = Rig::walking(0.5);
        rig.host.set_grounded(false);
        rig.source.latch_jump();

        assert_eq!(jump_event(rig.tick()), None);
        assert!(matches!(rig.state.phase, JumpPhase::Airborne));
    }

    #[test]
    fn test_jump_blocked_while_other_behaviour_holds_lock() {
        let mut rig = Rig::walking(0.5);
        let other = BehaviourId::from_code(9).unwrap();
        rig.host.subscribe(other);
        let _held = rig.host.lock_temp_behaviour(other).unwrap();
        rig.source.latch_jump();

        assert!(matches!(rig.tick(), TickOutcome::Skipped(_)));
        assert_eq!(rig.velocity.0.y, 0.0);
    }

    /// A second request inside the jump arc must not re-launch
    #[test]
    fn test_no_reentry_while_jump_locked() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();
        let launch = rig.velocity.0.y;

        rig.animator.jump = false;
        rig.source.latch_jump();
        let event = jump_event(rig.tick());

        assert_eq!(event, None);
        assert_eq!(rig.velocity.0.y, launch, "no second impulse");
        assert!(rig.state.phase.is_jump_locked());
    }

    #[test]
    fn test_landing_requires_strictly_falling() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();

        rig.velocity.0.y = 0.0;
        assert_eq!(jump_event(rig.tick()), None, "zero vertical velocity is not a landing");
        assert!(rig.state.phase.is_jump_locked());

        rig.velocity.0.y = -0.5;
        assert_eq!(jump_event(rig.tick()), Some(JumpEvent::Landed));
        assert!(matches!(rig.state.phase, JumpPhase::Grounded));
        assert!(!rig.animator.jump);
        assert!(rig.animator.grounded);
        assert_eq!(rig.friction.dynamic_coefficient, GRIP_FRICTION);
        assert_eq!(rig.friction.static_coefficient, GRIP_FRICTION);
        assert!(!rig.host.temp_lock_status(), "landing releases the lock");
    }

    #[test]
    fn test_falling_without_ground_does_not_land() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();

        rig.host.set_grounded(false);
        rig.velocity.0.y = -2.0;
        assert_eq!(jump_event(rig.tick()), None);
        assert!(rig.state.phase.is_jump_locked());
    }

    #[test]
    fn test_inertia_pushes_along_facing_in_the_air() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();

        rig.host.set_grounded(false);
        rig.velocity.0 = Vec3::new(0.0, 2.0, 0.0);
        rig.tick();

        let planar = rig.planar_velocity();
        // Forward input faces -Z.
        assert!(planar.z < 0.0, "inertia should follow facing, got {planar:?}");
        let expected = rig.config.jump_inertial_force * 9.81 * rig.config.sprint_speed * rig.ctx.dt;
        assert!((planar.length() - expected).abs() < 1e-3);
        assert_eq!(rig.velocity.0.y, 2.0, "inertia is planar");
        assert!(
            (rig.state.jump_carry - planar).length() < 1e-6,
            "carry is recorded for root motion"
        );

        // Landing stops the carry.
        rig.host.set_grounded(true);
        rig.velocity.0.y = -1.0;
        rig.tick();
        assert_eq!(rig.state.jump_carry, Vec3::ZERO);
    }

    #[test]
    fn test_inertia_stops_while_colliding() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();

        rig.host.set_grounded(false);
        rig.state.is_colliding = true;
        rig.velocity.0 = Vec3::new(0.0, 2.0, 0.0);
        rig.tick();

        assert_eq!(rig.planar_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_dropping_state_mid_jump_releases_lock() {
        let mut rig = Rig::walking(0.5);
        rig.source.latch_jump();
        rig.tick();
        assert!(rig.host.temp_lock_status());

        rig.state.phase = JumpPhase::Grounded;
        assert!(
            !rig.host.temp_lock_status(),
            "abandoning the jump phase must not leak the lock"
        );
    }

    #[test]
    fn test_policy_jump_slot_launches() {
        let mut rig = Rig::policy();
        rig.animator.speed = 0.5;
        rig.source.set_discrete_actions(&[1, 0, 0, 1]);

        assert_eq!(jump_event(rig.tick()), Some(JumpEvent::TookOff));
        assert_eq!(rig.velocity.0.y, rig.expected_launch());
    }
}
