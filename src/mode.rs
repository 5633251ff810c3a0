//! Finding the most frequent items of a sequence with a [`ChainedTable`]

use crate::ChainedTable;

/// Returns every item that occurs most often, in order of first appearance, together with
/// that frequency.
///
/// Items are counted by their string form. An empty input yields no modes and a frequency
/// of zero.
///
/// ```rust
/// use quadchain::find_mode;
///
/// let (modes, frequency) = find_mode(&["apple", "apple", "grape", "melon", "melon", "peach"]);
/// assert_eq!(modes, vec!["apple", "melon"]);
/// assert_eq!(frequency, 2);
/// ```
pub fn find_mode<T>(items: &[T]) -> (Vec<T>, usize)
where
    T: ToString + Clone,
{
    let mut counts: ChainedTable<usize> = ChainedTable::default();

    for item in items {
        let key = item.to_string();
        let count = counts.get(&key).copied().unwrap_or(0).saturating_add(1);
        counts.put(&key, count);
    }

    let mut modes = Vec::new();
    let mut max_frequency = 0;

    for item in items {
        let key = item.to_string();
        let frequency = counts.get(&key).copied().unwrap_or(0);

        if frequency > max_frequency {
            modes.clear();
            max_frequency = frequency;
        } else if frequency < max_frequency {
            continue;
        }

        modes.push(item.clone());
        // zeroed so repeats of this item are not emitted again
        counts.put(&key, 0);
    }

    (modes, max_frequency)
}
