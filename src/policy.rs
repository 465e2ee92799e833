//! Caller-side acceptance thresholds.
//!
//! The matcher reports its best guess with a method-specific score; callers
//! decide whether that guess is good enough to act on. Each method has its
//! own cutoff because the scores live on different scales.

use crate::search::{Method, Recognition, UNKNOWN_LABEL};

/// Per-method acceptance cutoffs.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds {
    /// Minimum good-match count for keypoint results.
    pub orb_min_matches: u32,
    /// Minimum correlation for fallback results.
    pub corr_min_score: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            orb_min_matches: 8,
            corr_min_score: 0.5,
        }
    }
}

impl Thresholds {
    /// True when the recognition clears the cutoff for its method.
    pub fn accepts(&self, rec: &Recognition) -> bool {
        match rec.method {
            Method::Orb => rec.score >= self.orb_min_matches as f32,
            Method::Corr => rec.score >= self.corr_min_score,
        }
    }

    /// Returns the recognized label, or [`UNKNOWN_LABEL`] below the cutoff.
    pub fn accept<'a>(&self, rec: &'a Recognition) -> &'a str {
        if self.accepts(rec) {
            &rec.label
        } else {
            UNKNOWN_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Thresholds;
    use crate::search::{Method, Recognition};

    fn rec(method: Method, score: f32) -> Recognition {
        Recognition {
            label: "Sword".to_owned(),
            score,
            method,
        }
    }

    #[test]
    fn orb_cutoff_is_inclusive() {
        let t = Thresholds::default();
        assert_eq!(t.accept(&rec(Method::Orb, 8.0)), "Sword");
        assert_eq!(t.accept(&rec(Method::Orb, 7.0)), "Unknown");
    }

    #[test]
    fn corr_uses_its_own_cutoff() {
        let t = Thresholds {
            orb_min_matches: 100,
            corr_min_score: 0.8,
        };
        assert_eq!(t.accept(&rec(Method::Corr, 0.85)), "Sword");
        assert_eq!(t.accept(&rec(Method::Corr, 0.79)), "Unknown");
        assert_eq!(t.accept(&rec(Method::Orb, 50.0)), "Unknown");
    }
}
