//! Per-entity-kind policies: collision shape, steering and collision reactions.

use crate::{checked_half_extents, Aabb, InvalidHalfExtents, KinematicState, MovementIntent};
use blockmotion_core::SimTick;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Capability set a moving entity kind supplies to the integrator.
pub trait Body {
    /// Collision box for the entity when its origin is at `position`.
    fn aabb_for_position(&self, position: DVec3) -> Aabb;

    /// Whether the coming tick runs at running speed.
    fn running(&self) -> bool {
        false
    }

    /// Issue this tick's movement commands.
    fn process_movement(&mut self, tick: SimTick, intent: &mut MovementIntent<'_>);

    /// Called after a vertical collision was resolved, before gravity is reset.
    fn on_vertical_collision(&mut self, _state: &mut KinematicState) {}

    /// Called after a horizontal collision was resolved.
    fn on_horizontal_collision(&mut self, _state: &mut KinematicState) {}
}

/// Held movement keys plus look deltas for a player-controlled entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerCommands {
    /// Walk forward.
    pub forward: bool,
    /// Walk backwards.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Rise (swimming / god mode).
    pub up: bool,
    /// Jump when on the ground.
    pub jump: bool,
    /// Run instead of walk.
    pub run: bool,
    /// Degrees to turn this tick.
    pub yaw: f64,
    /// Degrees to tilt this tick (positive looks up).
    pub pitch: f64,
}

/// Player-shaped body steered by [`PlayerCommands`].
///
/// Keys stay held until replaced; look deltas are applied once.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBody {
    half_extents: DVec3,
    commands: PlayerCommands,
}

impl PlayerBody {
    /// Default player half extents: 0.6 wide, 1.6 tall.
    pub const HALF_EXTENTS: DVec3 = DVec3::new(0.3, 0.8, 0.3);

    /// Player body with the default shape.
    pub fn new() -> Self {
        Self {
            half_extents: Self::HALF_EXTENTS,
            commands: PlayerCommands::default(),
        }
    }

    /// Player body with a custom shape.
    pub fn with_half_extents(half_extents: DVec3) -> Result<Self, InvalidHalfExtents> {
        Ok(Self {
            half_extents: checked_half_extents(half_extents)?,
            commands: PlayerCommands::default(),
        })
    }

    /// Replace the held commands.
    pub fn set_commands(&mut self, commands: PlayerCommands) {
        self.commands = commands;
    }

    /// Currently held commands.
    pub fn commands(&self) -> PlayerCommands {
        self.commands
    }
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::new()
    }
}

impl Body for PlayerBody {
    fn aabb_for_position(&self, position: DVec3) -> Aabb {
        Aabb::new(position, self.half_extents)
    }

    fn running(&self) -> bool {
        self.commands.run
    }

    fn process_movement(&mut self, _tick: SimTick, intent: &mut MovementIntent<'_>) {
        let commands = &mut self.commands;
        intent.rotate_yaw(commands.yaw);
        intent.rotate_pitch(commands.pitch);
        commands.yaw = 0.0;
        commands.pitch = 0.0;

        if commands.forward {
            intent.walk_forward();
        }
        if commands.backward {
            intent.walk_backwards();
        }
        if commands.left {
            intent.strafe_left();
        }
        if commands.right {
            intent.strafe_right();
        }
        if commands.up {
            intent.move_up();
        }
        if commands.jump {
            intent.jump();
        }
    }
}

/// Phase of an NPC's wander cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WanderState {
    /// Standing still
    Idle,
    /// Walking along the current heading
    Wandering,
}

/// Autonomous body that alternates between idling and wandering.
///
/// Timers and headings derive from the tick and position only, so runs are
/// reproducible. Bumping into a wall queues a jump.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcBody {
    half_extents: DVec3,
    state: WanderState,
    ai_timer: u32,
    jump_queued: bool,
}

impl NpcBody {
    /// NPC with the given collision half extents.
    pub fn new(half_extents: DVec3) -> Result<Self, InvalidHalfExtents> {
        Ok(Self {
            half_extents: checked_half_extents(half_extents)?,
            state: WanderState::Idle,
            ai_timer: 0,
            jump_queued: false,
        })
    }

    /// Current wander phase.
    pub fn wander_state(&self) -> WanderState {
        self.state
    }

    /// Whether a jump is queued for the next tick.
    pub fn jump_queued(&self) -> bool {
        self.jump_queued
    }
}

impl Body for NpcBody {
    fn aabb_for_position(&self, position: DVec3) -> Aabb {
        Aabb::new(position, self.half_extents)
    }

    fn process_movement(&mut self, tick: SimTick, intent: &mut MovementIntent<'_>) {
        self.ai_timer += 1;
        let position = intent.state().position();

        match self.state {
            WanderState::Idle => {
                // Idle for 40-79 ticks
                let idle_duration = 40 + ((tick.0 + position.x as u64) % 40);
                if self.ai_timer as u64 >= idle_duration {
                    self.state = WanderState::Wandering;
                    self.ai_timer = 0;
                    let heading = (tick.0 + position.x as u64 + position.z as u64) % 360;
                    intent.set_yaw(heading as f64);
                }
            }
            WanderState::Wandering => {
                intent.walk_forward();
                // Wander for 20-59 ticks
                let wander_duration = 20 + ((tick.0 + position.z as u64) % 40);
                if self.ai_timer as u64 >= wander_duration {
                    self.state = WanderState::Idle;
                    self.ai_timer = 0;
                }
            }
        }

        if self.jump_queued {
            intent.jump();
            self.jump_queued = false;
        }
    }

    fn on_horizontal_collision(&mut self, _state: &mut KinematicState) {
        if self.state == WanderState::Wandering {
            self.jump_queued = true;
        }
    }
}
