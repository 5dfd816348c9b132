use nalgebra::Vector3;

use serde_derive::*;

/// The landmark model reports 21 joints per hand, wrist first.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand as the detector reports it: joint positions in
/// normalized camera space, plus the handedness label when the model
/// produced one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHand {
    pub landmarks: Vec<Vector3<f32>>,

    #[serde(default)]
    pub handedness: Option<Handedness>,
}

impl RawHand {
    pub fn new(landmarks: Vec<Vector3<f32>>, handedness: Option<Handedness>) -> RawHand {
        RawHand {
            landmarks,
            handedness,
        }
    }

    /// A hand with anything but the full 21 landmarks is unusable.
    pub fn is_well_formed(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
    }
}

/// Distance in the camera plane. The landmark depth estimate is too noisy
/// to feed into the gesture ratios.
pub(crate) fn planar_distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}
