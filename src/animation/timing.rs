//! Duration and iteration count, read from a node's computed styles.
//!
//! Players don't expose these directly, so they are taken from the computed
//! `animation-duration`, `transition-duration` and `animation-iteration-count` of the
//! node. When several animations apply to one node the properties are
//! comma-separated lists, and the player's index on the node picks the entry.

use crate::animation::state::IterationCount;

/// Computed timing properties of one node, as the host reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedTiming {
    pub animation_duration: String,
    pub transition_duration: String,
    pub animation_iteration_count: String,
}

impl Default for ComputedTiming {
    fn default() -> Self {
        Self {
            animation_duration: "0s".to_string(),
            transition_duration: "0s".to_string(),
            animation_iteration_count: "1".to_string(),
        }
    }
}

/// Entry `index` of a comma-separated list, or the whole text if it is not a list.
fn list_entry(text: &str, index: usize) -> Option<&str> {
    if text.contains(',') {
        text.split(',').nth(index).map(str::trim)
    } else {
        Some(text.trim())
    }
}

/// Parse a CSS time (`1.5s`, `200ms`) into milliseconds.
fn parse_time_ms(text: &str) -> Option<f64> {
    let text = text.trim();
    if let Some(ms) = text.strip_suffix("ms") {
        ms.trim().parse::<f64>().ok()
    } else if let Some(s) = text.strip_suffix('s') {
        s.trim().parse::<f64>().ok().map(|secs| secs * 1000.0)
    } else {
        None
    }
}

impl ComputedTiming {
    /// Duration in milliseconds for the player at `index`.
    ///
    /// `animation-duration` wins unless it is `0s`; then `transition-duration` unless it
    /// is `0s`; otherwise there is no duration.
    pub fn duration_ms(&self, index: usize) -> Option<f64> {
        let text = if self.animation_duration.trim() != "0s" {
            &self.animation_duration
        } else if self.transition_duration.trim() != "0s" {
            &self.transition_duration
        } else {
            return None;
        };
        list_entry(text, index).and_then(parse_time_ms)
    }

    /// Iteration count for the player at `index`.
    pub fn iteration_count(&self, index: usize) -> Option<IterationCount> {
        let text = list_entry(&self.animation_iteration_count, index)?;
        if text == "infinite" {
            return Some(IterationCount::Infinite);
        }
        // Fractional counts are truncated.
        text.parse::<f64>()
            .ok()
            .filter(|n| *n >= 0.0)
            .map(|n| IterationCount::Finite(n as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(animation: &str, transition: &str, count: &str) -> ComputedTiming {
        ComputedTiming {
            animation_duration: animation.to_string(),
            transition_duration: transition.to_string(),
            animation_iteration_count: count.to_string(),
        }
    }

    #[test]
    fn test_animation_duration_wins() {
        let t = timing("2s", "1s", "1");
        assert_eq!(t.duration_ms(0), Some(2000.0));
    }

    #[test]
    fn test_falls_back_to_transition_duration() {
        let t = timing("0s", "350ms", "1");
        assert_eq!(t.duration_ms(0), Some(350.0));
    }

    #[test]
    fn test_no_duration_when_both_zero() {
        assert_eq!(ComputedTiming::default().duration_ms(0), None);
    }

    #[test]
    fn test_lists_are_indexed_by_player() {
        let t = timing("1s, 2.5s, 300ms", "0s", "1, infinite, 3");
        assert_eq!(t.duration_ms(1), Some(2500.0));
        assert_eq!(t.duration_ms(2), Some(300.0));
        assert_eq!(t.duration_ms(3), None);

        assert_eq!(t.iteration_count(0), Some(IterationCount::Finite(1)));
        assert_eq!(t.iteration_count(1), Some(IterationCount::Infinite));
        assert_eq!(t.iteration_count(2), Some(IterationCount::Finite(3)));
    }

    #[test]
    fn test_single_value_applies_to_every_player() {
        let t = timing("4s", "0s", "2");
        assert_eq!(t.duration_ms(5), Some(4000.0));
        assert_eq!(t.iteration_count(5), Some(IterationCount::Finite(2)));
    }

    #[test]
    fn test_garbage_is_absent() {
        let t = timing("soon", "0s", "many");
        assert_eq!(t.duration_ms(0), None);
        assert_eq!(t.iteration_count(0), None);
    }
}
