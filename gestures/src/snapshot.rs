use std::sync::{Arc, RwLock};

use nalgebra::Vector3;

use serde_derive::*;

use crate::landmarks::{LANDMARK_COUNT, MIDDLE_MCP};

/// Classified state of one hand. `landmarks` is either empty or holds the
/// full 21 points in normalized camera space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandState {
    pub openness: f32,
    pub pinch: f32,
    pub landmarks: Vec<Vector3<f32>>,
    pub present: bool,
}

impl HandState {
    pub fn absent() -> HandState {
        HandState {
            openness: 0.0,
            pinch: 0.0,
            landmarks: Vec::new(),
            present: false,
        }
    }

    /// Palm anchor (middle-finger knuckle) in camera space, when the hand
    /// is actually there.
    pub fn palm(&self) -> Option<Vector3<f32>> {
        if self.present && self.landmarks.len() == LANDMARK_COUNT {
            Some(self.landmarks[MIDDLE_MCP])
        } else {
            None
        }
    }
}

impl Default for HandState {
    fn default() -> HandState {
        HandState::absent()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GestureSnapshot {
    pub left: HandState,
    pub right: HandState,
}

impl GestureSnapshot {
    pub fn absent() -> GestureSnapshot {
        GestureSnapshot::default()
    }

    pub fn is_present(&self) -> bool {
        self.left.present || self.right.present
    }
}

/// Hands the simulator the most recent whole snapshot. Publication swaps a
/// single `Arc`, so a reader can never observe scalars from one frame paired
/// with landmarks from another, and never blocks waiting for a fresher one.
pub struct SnapshotPublisher {
    latest: RwLock<Arc<GestureSnapshot>>,
}

impl SnapshotPublisher {
    pub fn new() -> SnapshotPublisher {
        SnapshotPublisher {
            latest: RwLock::new(Arc::new(GestureSnapshot::absent())),
        }
    }

    pub fn publish(&self, snapshot: GestureSnapshot) {
        *self.latest.write().unwrap() = Arc::new(snapshot);
    }

    /// Most recent snapshot; possibly one frame stale, never half-written.
    pub fn latest(&self) -> Arc<GestureSnapshot> {
        self.latest.read().unwrap().clone()
    }

    /// Stopping the detector must not leave stale anchors behind, so it
    /// force-publishes the absent snapshot.
    pub fn clear(&self) {
        self.publish(GestureSnapshot::absent());
    }
}

impl Default for SnapshotPublisher {
    fn default() -> SnapshotPublisher {
        SnapshotPublisher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present_hand() -> HandState {
        HandState {
            openness: 0.7,
            pinch: 0.2,
            landmarks: vec![Vector3::new(0.5, 0.5, 0.0); LANDMARK_COUNT],
            present: true,
        }
    }

    #[test]
    fn absent_hand_has_no_palm() {
        assert!(HandState::absent().palm().is_none());
    }

    #[test]
    fn palm_is_middle_knuckle() {
        let mut hand = present_hand();
        hand.landmarks[MIDDLE_MCP] = Vector3::new(0.25, 0.75, 0.1);

        let palm = hand.palm().unwrap();
        assert!((palm.x - 0.25).abs() < 1e-6);
        assert!((palm.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn publisher_starts_absent() {
        let publisher = SnapshotPublisher::new();
        assert!(!publisher.latest().is_present());
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let publisher = SnapshotPublisher::new();

        // a reader holding the old snapshot keeps a consistent view
        let before = publisher.latest();

        publisher.publish(GestureSnapshot {
            left: present_hand(),
            right: HandState::absent(),
        });

        assert!(!before.is_present());
        let after = publisher.latest();
        assert!(after.left.present);
        assert_eq!(after.left.landmarks.len(), LANDMARK_COUNT);
    }

    #[test]
    fn clear_drops_back_to_absent() {
        let publisher = SnapshotPublisher::new();
        publisher.publish(GestureSnapshot {
            left: present_hand(),
            right: present_hand(),
        });

        publisher.clear();

        let latest = publisher.latest();
        assert!(!latest.is_present());
        assert_eq!(latest.left.openness, 0.0);
        assert!(latest.left.landmarks.is_empty());
    }
}
