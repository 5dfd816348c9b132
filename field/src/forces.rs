use nalgebra::Vector3;

use serde_derive::*;

use gestures::HandState;

/// Radius of a hand's influence around the palm anchor, in particle space.
pub const INTERACTION_RADIUS: f32 = 2.5;

/// Pinch level above which a hand holds (attracts) instead of pushing.
/// A hard switch, no hysteresis; values at the boundary may flicker.
pub const PINCH_HOLD_THRESHOLD: f32 = 0.8;

const ATTRACT_STRENGTH: f32 = 5.0;
const REPEL_STRENGTH: f32 = 8.0;

/// Maps normalized camera coordinates onto the particle coordinate system.
/// Camera x/y grow right/down while the field's grow left/up, hence the
/// mirrored axes.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct InteractionMap {
    pub width: f32,
    pub height: f32,
    pub depth_scale: f32,
}

impl Default for InteractionMap {
    fn default() -> InteractionMap {
        InteractionMap {
            width: 10.0,
            height: 10.0,
            depth_scale: -2.0,
        }
    }
}

impl InteractionMap {
    pub fn project(&self, landmark: &Vector3<f32>) -> Vector3<f32> {
        Vector3::new(
            (0.5 - landmark.x) * self.width,
            (0.5 - landmark.y) * self.height,
            landmark.z * self.depth_scale,
        )
    }
}

/// One hand's influence for a single tick: a palm anchor in particle space
/// and the attract/repel mode resolved from the pinch level.
#[derive(Debug, Clone, Copy)]
pub struct HandWell {
    anchor: Vector3<f32>,
    attract: bool,
}

impl HandWell {
    /// `None` when the hand is absent, so an absent hand contributes no
    /// force this tick.
    pub fn from_state(state: &HandState, map: &InteractionMap) -> Option<HandWell> {
        let palm = state.palm()?;

        Some(HandWell {
            anchor: map.project(&palm),
            attract: state.pinch > PINCH_HOLD_THRESHOLD,
        })
    }

    #[inline]
    pub fn anchor(&self) -> Vector3<f32> {
        self.anchor
    }

    /// Displacement for a particle at `position` over `dt` seconds. The
    /// strength falls off linearly to zero at the interaction radius; a
    /// particle sitting exactly on the anchor gets a zero vector back since
    /// the offset itself carries the direction (nothing is normalized).
    pub fn displacement(&self, position: &Vector3<f32>, dt: f32) -> Vector3<f32> {
        let offset = position - self.anchor;
        let dist = offset.norm();

        if dist >= INTERACTION_RADIUS {
            return Vector3::zeros();
        }

        let force = (INTERACTION_RADIUS - dist) / INTERACTION_RADIUS;

        if self.attract {
            -offset * force * ATTRACT_STRENGTH * dt
        } else {
            offset * force * REPEL_STRENGTH * dt
        }
    }
}
