//! Animation timing for layer turns.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use cube_core::{Face, Move};
use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Vec3};
use crate::projection::descriptor;

/// Default duration of one layer turn.
pub const DEFAULT_TURN_DURATION: Duration = Duration::from_millis(200);

/// Default frame interval for hosts that drive the engine on a timer.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Default distance between adjacent piece centers (unit piece plus gap).
pub const DEFAULT_PIECE_SPACING: f32 = 1.05;

/// Animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Wall-clock duration of one turn, whatever its size.
    pub duration: Duration,
    /// Suggested tick interval.
    pub frame_interval: Duration,
    /// Piece center spacing in render units.
    pub piece_spacing: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TURN_DURATION,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            piece_spacing: DEFAULT_PIECE_SPACING,
        }
    }
}

impl AnimationConfig {
    /// Turns complete on the first tick.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Override the turn duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Linear progress after `elapsed`, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Rotation angle about the face's outward normal at `progress`. Clockwise
/// turns are negative under the right-hand rule.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn turn_angle(mv: Move, progress: f32) -> f32 {
    -(mv.turn.signed_quarter_turns() as f32) * FRAC_PI_2 * progress.clamp(0.0, 1.0)
}

/// Interpolated layer rotation for `mv` at `progress`.
#[must_use]
pub fn layer_frame(mv: Move, progress: f32) -> Mat3 {
    Mat3::from_axis_angle(normal(mv.face), turn_angle(mv, progress))
}

fn normal(face: Face) -> Vec3 {
    descriptor(face).normal.as_vec3()
}
