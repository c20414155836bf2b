use std::fmt;

/// Highest score ever reported; the model never claims full certainty.
pub const MAX_SCORE: f64 = 0.99;
/// Lowest score bucketed as [`ConfidenceLevel::High`].
pub const HIGH_THRESHOLD: f64 = 0.85;
/// Lowest score bucketed as [`ConfidenceLevel::Medium`].
pub const MEDIUM_THRESHOLD: f64 = 0.60;

/// Rounds a raw model probability to two decimals and caps it at [`MAX_SCORE`].
pub fn cap_score(raw: f32) -> f64 {
    let rounded = (f64::from(raw) * 100.0).round() / 100.0;
    rounded.min(MAX_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            ConfidenceLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "✅",
            ConfidenceLevel::Medium => "⚠️",
            ConfidenceLevel::Low => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::Low => "Low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capped score and the bucket it falls in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    pub score: f64,
}

impl Confidence {
    /// Buckets a score that has already been through [`cap_score`].
    pub fn from_score(score: f64) -> Self {
        Self {
            level: ConfidenceLevel::from_score(score),
            score,
        }
    }

    /// Caps and buckets a raw model probability.
    pub fn from_raw(raw: f32) -> Self {
        Self::from_score(cap_score(raw))
    }

    /// Display label such as `✅ High (0.95)`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.level.marker(),
            self.level,
            format_score(self.score)
        )
    }
}

/// Shortest decimal form of a score, keeping one fractional digit for whole numbers.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.1}")
    } else {
        score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_near_certain_scores() {
        assert_eq!(cap_score(1.0), 0.99);
        assert_eq!(cap_score(0.999), 0.99);
        assert_eq!(cap_score(0.995), 0.99);
        assert_eq!(cap_score(0.99), 0.99);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(cap_score(0.8449), 0.84);
        assert_eq!(cap_score(0.6789), 0.68);
        assert_eq!(cap_score(0.95), 0.95);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.8499), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.60), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.5999), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(0.99), ConfidenceLevel::High);
    }

    #[test]
    fn total_over_reals() {
        assert_eq!(ConfidenceLevel::from_score(-3.0), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(42.0), ConfidenceLevel::High);
    }

    #[test]
    fn labels_echo_score() {
        assert_eq!(Confidence::from_score(0.95).label(), "✅ High (0.95)");
        assert_eq!(Confidence::from_score(0.85).label(), "✅ High (0.85)");
        assert_eq!(Confidence::from_score(0.7).label(), "⚠️ Medium (0.7)");
        assert_eq!(Confidence::from_score(0.6).label(), "⚠️ Medium (0.6)");
        assert_eq!(Confidence::from_score(0.51).label(), "❌ Low (0.51)");
        assert_eq!(Confidence::from_score(0.0).label(), "❌ Low (0.0)");
    }

    #[test]
    fn raw_scores_are_capped_before_bucketing() {
        let confidence = Confidence::from_raw(0.99987);
        assert_eq!(confidence.score, 0.99);
        assert_eq!(confidence.label(), "✅ High (0.99)");

        // rounds up into the High bucket
        assert_eq!(Confidence::from_raw(0.8451).level, ConfidenceLevel::High);
    }
}
