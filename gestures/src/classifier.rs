use nalgebra::Vector3;

use crate::landmarks::{
    planar_distance, Handedness, RawHand, INDEX_TIP, MIDDLE_MCP, MIDDLE_TIP, THUMB_TIP, WRIST,
};
use crate::snapshot::{GestureSnapshot, HandState};

/// Floor for the wrist-to-knuckle baseline so degenerate detections saturate
/// the ratios instead of dividing by zero.
const MIN_BASELINE: f32 = 0.1;

/// Openness ramps from 0 to 1 as the tip/baseline ratio goes 1.0 -> 1.8.
const OPENNESS_SPAN: f32 = 0.8;

/// Pinch saturates once thumb and index are closer than a third of the palm.
const PINCH_SCALE: f32 = 3.0;

/// Reduces one detector frame to the per-hand gesture state. Hands with a
/// truncated landmark list are dropped (reported absent); hands labelled
/// `Right` fill the right slot, everything else lands in the left one.
pub fn classify(hands: &[RawHand]) -> GestureSnapshot {
    let mut snapshot = GestureSnapshot::absent();

    for hand in hands {
        if !hand.is_well_formed() {
            continue;
        }

        let state = classify_hand(&hand.landmarks);

        match hand.handedness {
            Some(Handedness::Right) => snapshot.right = state,
            // unlabeled hands go left, as the original tracker did
            _ => snapshot.left = state,
        }
    }

    snapshot
}

fn classify_hand(landmarks: &[Vector3<f32>]) -> HandState {
    let baseline = planar_distance(&landmarks[WRIST], &landmarks[MIDDLE_MCP]).max(MIN_BASELINE);
    let extension = planar_distance(&landmarks[WRIST], &landmarks[MIDDLE_TIP]);
    let openness = ((extension / baseline - 1.0) / OPENNESS_SPAN).clamp(0.0, 1.0);

    let pinch_distance = planar_distance(&landmarks[THUMB_TIP], &landmarks[INDEX_TIP]);
    let pinch = (1.0 - (pinch_distance / baseline) * PINCH_SCALE).clamp(0.0, 1.0);

    HandState {
        openness,
        pinch,
        landmarks: landmarks.to_vec(),
        present: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LANDMARK_COUNT;

    fn hand(points: &[(usize, Vector3<f32>)], handedness: Option<Handedness>) -> RawHand {
        let mut landmarks = vec![Vector3::zeros(); LANDMARK_COUNT];
        for (index, point) in points {
            landmarks[*index] = *point;
        }
        RawHand::new(landmarks, handedness)
    }

    #[test]
    fn openness_saturates_at_double_baseline() {
        // wrist (0,0), knuckle (0,1), tip (0,2): ratio 2.0 -> exactly 1.0
        let raw = hand(
            &[
                (MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0)),
                (MIDDLE_TIP, Vector3::new(0.0, 2.0, 0.0)),
                // keep the pinch pair apart so it does not register
                (THUMB_TIP, Vector3::new(1.0, 0.0, 0.0)),
            ],
            None,
        );

        let snapshot = classify(&[raw]);
        assert_eq!(snapshot.left.openness, 1.0);
        assert!(snapshot.left.present);
    }

    #[test]
    fn openness_floors_at_zero_for_curled_fingers() {
        // tip no further than the knuckle
        let raw = hand(
            &[
                (MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0)),
                (MIDDLE_TIP, Vector3::new(0.0, 0.5, 0.0)),
            ],
            None,
        );

        assert_eq!(classify(&[raw]).left.openness, 0.0);
    }

    #[test]
    fn touching_fingers_pinch_fully() {
        let tip = Vector3::new(0.3, 0.3, 0.0);
        let raw = hand(
            &[
                (MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0)),
                (THUMB_TIP, tip),
                (INDEX_TIP, tip),
            ],
            None,
        );

        assert_eq!(classify(&[raw]).left.pinch, 1.0);
    }

    #[test]
    fn wide_fingers_do_not_pinch() {
        // pinch distance 0.4 over baseline 1.0 is past the 1/3 cutoff
        let raw = hand(
            &[
                (MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0)),
                (THUMB_TIP, Vector3::new(0.0, 0.0, 0.0)),
                (INDEX_TIP, Vector3::new(0.4, 0.0, 0.0)),
            ],
            None,
        );

        assert_eq!(classify(&[raw]).left.pinch, 0.0);
    }

    #[test]
    fn degenerate_baseline_is_floored() {
        // all landmarks stacked on the wrist: baseline floors at 0.1 and the
        // ratios saturate instead of blowing up
        let raw = hand(&[], None);

        let state = classify(&[raw]);
        assert_eq!(state.left.openness, 0.0);
        assert_eq!(state.left.pinch, 1.0);
        assert!(state.left.openness.is_finite());
    }

    #[test]
    fn truncated_hand_is_reported_absent() {
        let raw = RawHand::new(vec![Vector3::zeros(); 7], Some(Handedness::Right));

        let snapshot = classify(&[raw]);
        assert!(!snapshot.right.present);
        assert!(snapshot.right.landmarks.is_empty());
    }

    #[test]
    fn right_label_fills_right_slot() {
        let raw = hand(
            &[(MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0))],
            Some(Handedness::Right),
        );

        let snapshot = classify(&[raw]);
        assert!(snapshot.right.present);
        assert!(!snapshot.left.present);
    }

    #[test]
    fn unlabeled_hand_falls_in_left_bucket() {
        let raw = hand(&[(MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0))], None);

        let snapshot = classify(&[raw]);
        assert!(snapshot.left.present);
        assert!(!snapshot.right.present);
    }

    #[test]
    fn no_hands_means_both_absent() {
        let snapshot = classify(&[]);
        assert!(!snapshot.is_present());
        assert_eq!(snapshot.left.openness, 0.0);
        assert_eq!(snapshot.right.pinch, 0.0);
    }

    #[test]
    fn both_hands_classified_in_one_frame() {
        let left = hand(
            &[
                (MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0)),
                (MIDDLE_TIP, Vector3::new(0.0, 2.0, 0.0)),
                (THUMB_TIP, Vector3::new(1.0, 0.0, 0.0)),
            ],
            Some(Handedness::Left),
        );
        let right = hand(
            &[(MIDDLE_MCP, Vector3::new(0.0, 1.0, 0.0))],
            Some(Handedness::Right),
        );

        let snapshot = classify(&[left, right]);
        assert_eq!(snapshot.left.openness, 1.0);
        assert_eq!(snapshot.right.pinch, 1.0);
    }
}
