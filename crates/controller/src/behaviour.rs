//! Per-character arbitration between behaviours.
//!
//! Every behaviour on a character is identified by a [`BehaviourId`]. The
//! [`BehaviourManager`] decides which one currently owns the character and
//! hands out [`TempLock`] guards that let one behaviour keep control for a
//! bounded span (a jump arc). Dropping the guard releases the lock.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use bevy::log::debug;
use bevy::prelude::{Component, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::TURN_SMOOTHING;
use crate::movement::facing_rotation;

const UNLOCKED: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviourId(NonZeroU32);

/// The locomotion behaviour's identity.
pub const MOVE_BEHAVIOUR: BehaviourId = BehaviourId(NonZeroU32::MIN);

impl BehaviourId {
    pub fn from_code(code: u32) -> Option<Self> {
        NonZeroU32::new(code).map(Self)
    }

    pub fn code(self) -> u32 {
        self.0.get()
    }
}

/// Exclusive hold on character control. Released on drop.
#[derive(Debug)]
#[must_use = "dropping a TempLock releases it immediately"]
pub struct TempLock {
    slot: Arc<AtomicU32>,
    owner: BehaviourId,
}

impl TempLock {
    pub fn owner(&self) -> BehaviourId {
        self.owner
    }
}

impl Drop for TempLock {
    fn drop(&mut self) {
        let released = self
            .slot
            .compare_exchange(
                self.owner.code(),
                UNLOCKED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if released {
            debug!("temp lock released by behaviour {}", self.owner.code());
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Subscription {
    id: BehaviourId,
    allow_sprint: bool,
}

#[derive(Component, Debug)]
pub struct BehaviourManager {
    subscriptions: Vec<Subscription>,
    default_behaviour: Option<BehaviourId>,
    current_behaviour: Option<BehaviourId>,
    overriding: Vec<BehaviourId>,
    temp_lock: Arc<AtomicU32>,
    policy_mode: bool,
    grounded: bool,
    axes: Vec2,
    sprint_input: bool,
    last_direction: Vec3,
    turn_smoothing: f32,
}

impl Default for BehaviourManager {
    fn default() -> Self {
        Self {
            subscriptions: Vec::new(),
            default_behaviour: None,
            current_behaviour: None,
            overriding: Vec::new(),
            temp_lock: Arc::new(AtomicU32::new(UNLOCKED)),
            policy_mode: false,
            grounded: false,
            axes: Vec2::ZERO,
            sprint_input: false,
            last_direction: Vec3::ZERO,
            turn_smoothing: TURN_SMOOTHING,
        }
    }
}

impl BehaviourManager {
    /// A manager with `id` subscribed and registered as the default behaviour.
    pub fn with_default(id: BehaviourId) -> Self {
        let mut manager = Self::default();
        manager.subscribe(id);
        manager.register_default(id);
        manager
    }

    pub fn subscribe(&mut self, id: BehaviourId) {
        if !self.subscriptions.iter().any(|s| s.id == id) {
            self.subscriptions.push(Subscription {
                id,
                allow_sprint: true,
            });
        }
    }

    pub fn register_default(&mut self, id: BehaviourId) {
        self.default_behaviour = Some(id);
        self.current_behaviour = Some(id);
    }

    /// Make `id` the current behaviour unless it already is.
    pub fn register_behaviour(&mut self, id: BehaviourId) {
        if self.current_behaviour == self.default_behaviour {
            self.current_behaviour = Some(id);
        }
    }

    pub fn unregister_behaviour(&mut self, id: BehaviourId) {
        if self.current_behaviour == Some(id) {
            self.current_behaviour = self.default_behaviour;
        }
    }

    pub fn override_with(&mut self, id: BehaviourId) {
        if !self.overriding.contains(&id) {
            self.overriding.push(id);
        }
    }

    pub fn revoke_override(&mut self, id: BehaviourId) {
        self.overriding.retain(|o| *o != id);
    }

    pub fn is_overriding(&self) -> bool {
        !self.overriding.is_empty()
    }

    pub fn current_behaviour(&self) -> Option<BehaviourId> {
        self.current_behaviour
    }

    pub fn is_current_behaviour(&self, id: BehaviourId) -> bool {
        self.current_behaviour == Some(id)
    }

    /// Acquire the temporary lock for `id`. `None` when another behaviour holds it.
    pub fn lock_temp_behaviour(&self, id: BehaviourId) -> Option<TempLock> {
        match self.temp_lock.compare_exchange(
            UNLOCKED,
            id.code(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => Some(TempLock {
                slot: Arc::clone(&self.temp_lock),
                owner: id,
            }),
            Err(holder) => {
                debug!(
                    "behaviour {} cannot lock, held by {}",
                    id.code(),
                    holder
                );
                None
            }
        }
    }

    pub fn temp_lock_status(&self) -> bool {
        self.temp_lock.load(Ordering::Acquire) != UNLOCKED
    }

    pub fn temp_lock_holder(&self) -> Option<BehaviourId> {
        BehaviourId::from_code(self.temp_lock.load(Ordering::Acquire))
    }

    /// Whether `id` may apply forces this tick: it holds the temporary lock,
    /// or nothing is locked or overriding and it is the current behaviour.
    pub fn may_drive(&self, id: BehaviourId) -> bool {
        match self.temp_lock_holder() {
            Some(holder) => holder == id,
            None => !self.is_overriding() && self.is_current_behaviour(id),
        }
    }

    pub fn set_policy_mode(&mut self, enabled: bool) {
        if self.policy_mode != enabled {
            debug!("policy mode {}", if enabled { "enabled" } else { "disabled" });
        }
        self.policy_mode = enabled;
    }

    pub fn is_policy_mode(&self) -> bool {
        self.policy_mode
    }

    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Horizontal (strafe) and vertical (forward) movement axes.
    pub fn set_axes(&mut self, axes: Vec2) {
        self.axes = axes;
    }

    pub fn axes(&self) -> Vec2 {
        self.axes
    }

    pub fn is_moving(&self) -> bool {
        self.axes.x != 0.0 || self.axes.y != 0.0
    }

    pub fn set_sprint_input(&mut self, pressed: bool) {
        self.sprint_input = pressed;
    }

    pub fn set_allow_sprint(&mut self, id: BehaviourId, allow: bool) {
        if let Some(subscription) = self.subscriptions.iter_mut().find(|s| s.id == id) {
            subscription.allow_sprint = allow;
        }
    }

    fn can_sprint(&self) -> bool {
        self.subscriptions.iter().all(|s| s.allow_sprint)
    }

    pub fn is_sprinting(&self) -> bool {
        self.sprint_input && self.is_moving() && self.can_sprint()
    }

    pub fn set_last_direction(&mut self, direction: Vec3) {
        self.last_direction = direction;
    }

    pub fn last_direction(&self) -> Vec3 {
        self.last_direction
    }

    /// Ease the body's yaw toward the last movement direction.
    pub fn repositioning(&self, rotation: &mut Quat) {
        let planar = Vec3::new(self.last_direction.x, 0.0, self.last_direction.z);
        if let Some(target) = facing_rotation(planar) {
            *rotation = rotation.slerp(target, self.turn_smoothing);
        }
    }
}
