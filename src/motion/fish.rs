//! Per-endpoint motion state machine.
//!
//! Target values (depth, roll) jump instantly on a health transition; the
//! current values chase them with exponential smoothing every frame, so the
//! visible motion is always continuous.

use std::f32::consts::PI;

use rand::Rng;

use crate::status::HealthState;

/// Vertical position of the water surface.
pub const SURFACE_Y: f32 = 2.4;
/// Per-frame smoothing factor for vertical position.
pub const POSITION_SMOOTHING: f32 = 0.02;
/// Per-frame smoothing factor for roll.
pub const ROLL_SMOOTHING: f32 = 0.03;
/// Roll magnitude below which the fish counts as upright again.
pub const UPRIGHT_EPSILON: f32 = 0.1;

/// Belly-up roll target for a failing endpoint.
const BELLY_UP: f32 = PI;
/// One full orbit, after which the swim direction reverses.
const FULL_TURN: f32 = 2.0 * PI;

/// What the fish is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    /// Healthy drift along a circular arc.
    Swimming,
    /// Health went to error: rolling belly-up and rising to the surface.
    Ascending,
    /// Health is back: rolling upright, still at the surface.
    Recovering,
    /// Static pose for preview contexts; no drifting, no interpolation.
    IdlePreview,
}

/// Position and orientation handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// Motion state for one endpoint's fish.
#[derive(Debug)]
pub struct FishMotion {
    phase: MotionPhase,
    pose: Pose,
    /// Current angle on the orbit circle.
    angle: f32,
    /// Angle swept since the last direction reversal.
    swept: f32,
    radius: f32,
    angular_speed: f32,
    /// +1.0 or -1.0.
    direction: f32,
    /// Resting depth this fish returns to when healthy.
    baseline_y: f32,
    target_y: f32,
    target_roll: f32,
}

impl FishMotion {
    /// Create a fish with a randomized orbit, heading, and resting depth.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self::with_params(
            rng.gen_range(1.5..4.0),
            rng.gen_range(0.005..0.02),
            rng.gen_range(-2.0..0.0),
            rng.gen_range(0.0..FULL_TURN),
            if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
        )
    }

    /// Create a fish with explicit parameters (for tests).
    pub fn with_params(
        radius: f32,
        angular_speed: f32,
        baseline_y: f32,
        angle: f32,
        direction: f32,
    ) -> Self {
        let pose = Pose {
            x: radius * angle.cos(),
            y: baseline_y,
            z: radius * angle.sin(),
            yaw: angle + direction * (PI / 2.0),
            roll: 0.0,
        };
        Self {
            phase: MotionPhase::Swimming,
            pose,
            angle,
            swept: 0.0,
            radius,
            angular_speed,
            direction,
            baseline_y,
            target_y: baseline_y,
            target_roll: 0.0,
        }
    }

    /// Create a static preview fish showing only healthy-or-not.
    pub fn preview(healthy: bool) -> Self {
        let mut fish = Self::with_params(2.0, 0.0, -1.0, 0.0, 1.0);
        fish.phase = MotionPhase::IdlePreview;
        fish.set_preview_healthy(healthy);
        fish
    }

    /// Current phase.
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Current pose without advancing the animation.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current swim direction (+1.0 or -1.0).
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Target roll angle (changes instantly; the pose chases it).
    pub fn target_roll(&self) -> f32 {
        self.target_roll
    }

    /// Target depth (changes instantly; the pose chases it).
    pub fn target_y(&self) -> f32 {
        self.target_y
    }

    /// Flip the previewed state. Applies immediately, no interpolation.
    pub fn set_preview_healthy(&mut self, healthy: bool) {
        let roll = if healthy { 0.0 } else { BELLY_UP };
        self.pose.roll = roll;
        self.target_roll = roll;
    }

    /// Advance one rendered frame.
    ///
    /// A missing or pending health status changes nothing; whatever motion
    /// is in progress simply continues.
    pub fn update(&mut self, health: Option<HealthState>) -> Pose {
        self.apply_transitions(health);

        match self.phase {
            MotionPhase::IdlePreview => return self.pose,
            MotionPhase::Swimming => self.advance_orbit(),
            // Horizontal drift is suspended while surfaced.
            MotionPhase::Ascending | MotionPhase::Recovering => {}
        }

        self.pose.y += (self.target_y - self.pose.y) * POSITION_SMOOTHING;
        self.pose.roll += (self.target_roll - self.pose.roll) * ROLL_SMOOTHING;

        // Recovery completes only once the roll has visually finished, so
        // the dive never overlaps the righting motion.
        if self.phase == MotionPhase::Recovering && self.pose.roll.abs() < UPRIGHT_EPSILON {
            self.phase = MotionPhase::Swimming;
            self.target_y = self.baseline_y;
        }

        self.pose
    }

    fn apply_transitions(&mut self, health: Option<HealthState>) {
        if self.phase == MotionPhase::IdlePreview {
            return;
        }
        match health {
            Some(HealthState::Error) => {
                if self.phase != MotionPhase::Ascending {
                    self.phase = MotionPhase::Ascending;
                    self.target_y = SURFACE_Y;
                    self.target_roll = BELLY_UP;
                }
            }
            Some(HealthState::Ok) => {
                if self.phase == MotionPhase::Ascending {
                    self.phase = MotionPhase::Recovering;
                    self.target_roll = 0.0;
                }
            }
            // Unknown or pending: keep doing whatever we were doing.
            Some(HealthState::Pending) | None => {}
        }
    }

    fn advance_orbit(&mut self) {
        let step = self.angular_speed * self.direction;
        self.angle += step;
        self.swept += step.abs();

        if self.swept >= FULL_TURN {
            self.direction = -self.direction;
            self.swept = 0.0;
        }

        self.pose.x = self.radius * self.angle.cos();
        self.pose.z = self.radius * self.angle.sin();
        self.pose.yaw = self.angle + self.direction * (PI / 2.0);
    }
}

impl Default for FishMotion {
    fn default() -> Self {
        Self::new()
    }
}
