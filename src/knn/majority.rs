use std::collections::BTreeMap;

// Most frequent label among the neighbors.
// Counts live in an ordered map, so on a tie the lowest label wins.
pub fn majority_vote(labels: impl IntoIterator<Item = usize>) -> Option<usize> {
    let mut counts = BTreeMap::<usize, usize>::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut best: Option<(usize, usize)> = None;
    for (label, count) in counts {
        // Strictly greater keeps the earlier (lower) label on ties
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_winner() {
        assert_eq!(majority_vote([8, 3, 8, 8, 3]), Some(8));
    }

    #[test]
    fn test_tie_goes_to_lowest_label() {
        assert_eq!(majority_vote([8, 3, 3, 8]), Some(3));
        assert_eq!(majority_vote([9, 2, 5]), Some(2));
    }

    #[test]
    fn test_sparse_labels() {
        // Labels are not indices into a table
        assert_eq!(majority_vote([1_000_000, 7, 1_000_000]), Some(1_000_000));
    }

    #[test]
    fn test_empty() {
        assert_eq!(majority_vote(Vec::new()), None);
    }
}
