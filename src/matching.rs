use crate::detected_hands::DetectedHand;

/// Largest wrist row difference (normalized image coordinates) accepted as
/// the same physical hand.
pub const DEFAULT_MATCH_TOLERANCE: f32 = 0.1;

/// Index of the right-camera hand whose wrist row is closest to `left`'s,
/// provided the difference is strictly below `tolerance`.
pub fn find_matching_hand(
    left: &DetectedHand,
    right_hands: &[DetectedHand],
    tolerance: f32,
) -> Option<usize> {
    let wrist_y = left.wrist()?.y;
    let mut best_idx = None;
    let mut best_diff = f32::INFINITY;
    for (idx, hand) in right_hands.iter().enumerate() {
        let Some(wrist) = hand.wrist() else {
            continue;
        };
        // NaN never compares less, so an unusable wrist is never picked
        let diff = (wrist_y - wrist.y).abs();
        if diff < best_diff {
            best_idx = Some(idx);
            best_diff = diff;
        }
    }
    best_idx.filter(|_| best_diff < tolerance)
}

/// Greedily pairs every left hand with its nearest right hand by wrist row.
///
/// Each left hand is matched independently, so two left hands may select the
/// same right hand. Unmatched left hands are omitted.
pub fn match_hands(
    left_hands: &[DetectedHand],
    right_hands: &[DetectedHand],
    tolerance: f32,
) -> Vec<(usize, usize)> {
    left_hands
        .iter()
        .enumerate()
        .filter_map(|(li, left)| {
            let ri = find_matching_hand(left, right_hands, tolerance);
            if ri.is_none() {
                log::debug!("left hand {} has no right-camera match", li);
            }
            ri.map(|ri| (li, ri))
        })
        .collect()
}
