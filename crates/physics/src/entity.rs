//! The per-tick integrator for a single moving entity.

use crate::integrator::{accumulate_gravity, apply_friction, clamp_to_speed};
use crate::{
    Aabb, Body, CollisionResolver, FootstepClock, InvalidMovementParams, KinematicState,
    LookupPolicy, MovementIntent, MovementParams, WorldGrid, WorldLookupFailure, EYE_MARGIN,
};
use blockmotion_audio::{SilentPlayer, SoundId, SoundPlayer};
use blockmotion_core::SimTick;
use glam::DVec3;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

type Listener = Box<dyn Fn(DVec3) -> DVec3 + Send + Sync>;

/// What happened during one [`MovableEntity::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick that was simulated.
    pub tick: SimTick,
    /// A solid block was hit while moving vertically.
    pub vertical_collision: bool,
    /// A solid block was hit while moving horizontally.
    pub horizontal_collision: bool,
    /// Sounds emitted, in order.
    pub sounds_played: Vec<SoundId>,
    /// The entity fell below zero and was lifted onto the terrain.
    pub clamped_to_terrain: bool,
}

/// An entity moving through the block grid under gravity, friction and collision.
///
/// `B` supplies the collision shape and steering, `S` receives positional
/// sounds. Each call to [`update`](Self::update) advances exactly one tick.
///
/// Ticks are atomic: the update runs on a working copy of the state, body and
/// footstep clock, and only a successful tick is committed. Sounds are
/// buffered and handed to the player after the commit.
pub struct MovableEntity<B, S = SilentPlayer> {
    state: KinematicState,
    body: B,
    params: MovementParams,
    sound: S,
    listener: Listener,
    footsteps: FootstepClock,
    lookup_policy: LookupPolicy,
    audible: bool,
    tick: SimTick,
}

impl<B, S> MovableEntity<B, S>
where
    B: Body + Clone,
    S: SoundPlayer,
{
    /// Entity at `position`, facing yaw 0 / pitch 0, with zeroed kinematics.
    pub fn new(
        body: B,
        params: MovementParams,
        sound: S,
        position: DVec3,
    ) -> Result<Self, InvalidMovementParams> {
        Ok(Self {
            state: KinematicState::new(position, 0.0, 0.0),
            body,
            params: params.validated()?,
            sound,
            listener: Box::new(|_| DVec3::ZERO),
            footsteps: FootstepClock::default(),
            lookup_policy: LookupPolicy::default(),
            audible: true,
            tick: SimTick::ZERO,
        })
    }

    /// Use `listener` to turn the entity's position into a listener-relative one.
    pub fn with_listener(
        mut self,
        listener: impl Fn(DVec3) -> DVec3 + Send + Sync + 'static,
    ) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Choose how lookup failures are handled.
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Disable footstep sounds.
    pub fn silent(mut self) -> Self {
        self.audible = false;
        self
    }

    /// Current kinematic state.
    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// Body policy.
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Body policy, for feeding commands.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Movement constants.
    pub fn params(&self) -> &MovementParams {
        &self.params
    }

    /// Sound player.
    pub fn sound(&self) -> &S {
        &self.sound
    }

    /// Sound player, mutably.
    pub fn sound_mut(&mut self) -> &mut S {
        &mut self.sound
    }

    /// Footstep timing state.
    pub fn footsteps(&self) -> &FootstepClock {
        &self.footsteps
    }

    /// Lookup failure handling in effect.
    pub fn lookup_policy(&self) -> LookupPolicy {
        self.lookup_policy
    }

    /// Whether footsteps are emitted.
    pub fn is_audible(&self) -> bool {
        self.audible
    }

    /// Tick the next update will simulate.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Entity origin.
    pub fn position(&self) -> DVec3 {
        self.state.position()
    }

    /// Speed selected for the last tick.
    pub fn active_walking_speed(&self) -> f64 {
        self.params.active_walking_speed(self.state.running())
    }

    /// Zero velocity, pending movement and gravity.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Move without collision handling.
    pub fn teleport(&mut self, position: DVec3) {
        self.state.teleport(position);
    }

    /// Toggle free-fly mode.
    pub fn set_god_mode(&mut self, enabled: bool) {
        self.state.set_god_mode(enabled);
    }

    /// Turn by `delta` degrees.
    pub fn rotate_yaw(&mut self, delta: f64) {
        self.state.rotate_yaw(delta);
    }

    /// Tilt by `delta` degrees.
    pub fn rotate_pitch(&mut self, delta: f64) {
        self.state.rotate_pitch(delta);
    }

    /// Set absolute yaw in degrees.
    pub fn set_yaw(&mut self, yaw: f64) {
        self.state.set_yaw(yaw);
    }

    /// Set absolute pitch in degrees.
    pub fn set_pitch(&mut self, pitch: f64) {
        self.state.set_pitch(pitch);
    }

    /// Face `target`.
    pub fn look_at(&mut self, target: DVec3) {
        self.state.look_at(target);
    }

    /// Unit vector the entity is looking along.
    pub fn viewing_direction(&self) -> DVec3 {
        self.state.viewing_direction()
    }

    /// Squared distance from the entity to `target`.
    pub fn distance_squared_to(&self, target: DVec3) -> f64 {
        self.state.distance_squared_to(target)
    }

    /// Collision box at the current position.
    pub fn aabb(&self) -> Aabb {
        self.body.aabb_for_position(self.state.position())
    }

    /// Eye point relative to the origin.
    pub fn eye_offset(&self) -> DVec3 {
        DVec3::new(0.0, self.aabb().half_extents().y - EYE_MARGIN, 0.0)
    }

    /// Eye point in world space.
    pub fn eye_position(&self) -> DVec3 {
        self.state.position() + self.eye_offset()
    }

    /// Solid colliders around the entity, nearest cell first.
    pub fn nearby_colliders<W: WorldGrid + ?Sized>(
        &self,
        world: &W,
    ) -> Result<Vec<Aabb>, WorldLookupFailure> {
        CollisionResolver::new(world, self.lookup_policy).nearby_colliders(self.state.position())
    }

    /// Advance one tick.
    ///
    /// On error nothing is committed: state, body, footstep clock and tick
    /// counter are exactly as before the call, no sound is played and no
    /// random draw is taken from `world`.
    pub fn update<W: WorldGrid + ?Sized>(
        &mut self,
        world: &W,
    ) -> Result<TickReport, WorldLookupFailure> {
        let params = self.params;
        let resolver = CollisionResolver::new(world, self.lookup_policy);
        let mut state = self.state;
        let mut body = self.body.clone();
        let mut footsteps = self.footsteps;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };
        // Sound variants are drawn from the world only once the tick commits.
        let mut contact_sounds = 0usize;
        let mut footstep_due = false;

        state.running = body.running();
        let speed = params.active_walking_speed(state.running);
        body.process_movement(self.tick, &mut MovementIntent::new(&mut state, speed));

        state.velocity = clamp_to_speed(apply_friction(state.velocity, params.friction), speed);
        state.velocity += state.movement_direction;
        state.movement_direction = DVec3::ZERO;
        state.gravity =
            accumulate_gravity(state.gravity, state.god_mode, state.is_swimming, &params);

        let origin = state.position;
        state.position.y += state.velocity.y + state.gravity;

        if !state.god_mode {
            if resolver.vertical_hit_test(&body, &mut state, origin)? {
                report.vertical_collision = true;
                body.on_vertical_collision(&mut state);

                let old_gravity = state.gravity;
                state.gravity = 0.0;
                if old_gravity <= 0.0 {
                    if state.jump_requested {
                        contact_sounds += 1;
                        state.jump_requested = false;
                        state.gravity = params.jump_intensity;
                    } else if !state.touching_ground {
                        contact_sounds += 1;
                        state.touching_ground = true;
                    }
                } else {
                    state.touching_ground = false;
                }
            } else {
                state.touching_ground = false;
            }
        } else {
            state.gravity = 0.0;
        }

        let old_position = state.position;
        state.position.x += state.velocity.x;
        state.position.z += state.velocity.z;
        state.step_counter += state.velocity.x.abs().max(state.velocity.z.abs());

        if !state.god_mode && resolver.horizontal_hit_test(&body, &mut state, old_position)? {
            report.horizontal_collision = true;
            body.on_horizontal_collision(&mut state);
        }

        if !state.god_mode && state.position.y < 0.0 {
            // Truncate toward zero like the column lookup expects.
            let (x, z) = (state.position.x as i32, state.position.z as i32);
            match world.max_terrain_height_at(x, z) {
                Ok(height) => {
                    state.position.y = height;
                    report.clamped_to_terrain = true;
                }
                Err(err) => match self.lookup_policy {
                    LookupPolicy::Abort => return Err(err),
                    LookupPolicy::TreatAsAir => {
                        warn!(%err, "Terrain height unavailable; leaving entity below zero");
                    }
                },
            }
        }

        let swim = resolver.swim_status(&body, state.position)?;
        state.is_swimming = swim.swimming;
        state.head_under_water = swim.head_under_water;

        if !state.god_mode && self.audible {
            footstep_due = footsteps.advance(
                self.tick,
                state.velocity,
                state.touching_ground,
                speed / params.walking_speed,
                params.footstep_interval_ticks,
            );
        }

        self.state = state;
        self.body = body;
        self.footsteps = footsteps;
        self.tick = self.tick.advance(1);

        for _ in 0..contact_sounds {
            report.sounds_played.push(SoundId::footstep(world.random_int()));
        }
        if footstep_due {
            let step = SoundId::footstep(world.random_int());
            self.footsteps.start(step);
            report.sounds_played.push(step);
        }

        if !report.sounds_played.is_empty() {
            let relative = (self.listener)(self.state.position);
            for &sound in &report.sounds_played {
                self.sound.play_positional(sound, relative);
            }
        }

        if report.vertical_collision || report.horizontal_collision {
            debug!(
                tick = report.tick.0,
                vertical = report.vertical_collision,
                horizontal = report.horizontal_collision,
                position = ?self.state.position,
                "Collision resolved"
            );
        }

        Ok(report)
    }
}

impl<B: fmt::Debug, S: fmt::Debug> fmt::Debug for MovableEntity<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovableEntity")
            .field("state", &self.state)
            .field("body", &self.body)
            .field("params", &self.params)
            .field("sound", &self.sound)
            .field("footsteps", &self.footsteps)
            .field("lookup_policy", &self.lookup_policy)
            .field("audible", &self.audible)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
