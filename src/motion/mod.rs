//! Animated motion derived from health status.
//!
//! Each endpoint gets one [`FishMotion`] instance that turns discrete health
//! transitions into continuous movement: healthy fish orbit lazily, a
//! failing endpoint's fish rolls belly-up and floats to the surface, and a
//! recovered one rights itself before diving back down. The
//! [`AquariumDriver`] steps every instance once per rendered frame and never
//! waits on network I/O.

mod driver;
mod fish;

pub use driver::AquariumDriver;
pub use fish::{
    FishMotion, MotionPhase, Pose, POSITION_SMOOTHING, ROLL_SMOOTHING, SURFACE_Y,
    UPRIGHT_EPSILON,
};
