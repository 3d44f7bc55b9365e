use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::CreditScore;

/// Lowest score that counts as having a credit history.
pub const CREDIT_HISTORY_THRESHOLD: u16 = 600;

/// Binary model feature derived from the credit score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditHistoryFlag {
    Absent,
    Present,
}

impl CreditHistoryFlag {
    pub const fn value(self) -> u8 {
        match self {
            CreditHistoryFlag::Absent => 0,
            CreditHistoryFlag::Present => 1,
        }
    }

    pub fn as_feature(self) -> f64 {
        f64::from(self.value())
    }
}

/// Collapse a credit score into the `Credit_History` flag the model was trained on.
pub fn bucket(score: CreditScore) -> CreditHistoryFlag {
    if score.value() >= CREDIT_HISTORY_THRESHOLD {
        CreditHistoryFlag::Present
    } else {
        CreditHistoryFlag::Absent
    }
}

/// Display-only rating shown next to the score; never fed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CreditBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CreditBand {
    pub fn from_score(score: CreditScore) -> Self {
        match score.value() {
            750..=u16::MAX => CreditBand::Excellent,
            690..=749 => CreditBand::Good,
            600..=689 => CreditBand::Fair,
            _ => CreditBand::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CreditBand::Poor => "Poor Credit Score",
            CreditBand::Fair => "Fair Credit Score",
            CreditBand::Good => "Good Credit Score",
            CreditBand::Excellent => "Excellent Credit Score",
        }
    }
}

impl fmt::Display for CreditBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn score(value: i64) -> CreditScore {
        CreditScore::new(value).expect("score within scale")
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(bucket(score(600)), CreditHistoryFlag::Present);
        assert_eq!(bucket(score(599)), CreditHistoryFlag::Absent);
        assert_eq!(bucket(score(300)).value(), 0);
        assert_eq!(bucket(score(900)).value(), 1);
    }

    #[test]
    fn bands_follow_form_indicator() {
        assert_eq!(CreditBand::from_score(score(300)), CreditBand::Poor);
        assert_eq!(CreditBand::from_score(score(599)), CreditBand::Poor);
        assert_eq!(CreditBand::from_score(score(600)), CreditBand::Fair);
        assert_eq!(CreditBand::from_score(score(689)), CreditBand::Fair);
        assert_eq!(CreditBand::from_score(score(690)), CreditBand::Good);
        assert_eq!(CreditBand::from_score(score(749)), CreditBand::Good);
        assert_eq!(CreditBand::from_score(score(750)), CreditBand::Excellent);
        assert_eq!(CreditBand::from_score(score(900)), CreditBand::Excellent);
    }

    proptest! {
        #[test]
        fn scores_below_threshold_have_no_history(value in 300i64..600) {
            prop_assert_eq!(bucket(score(value)).value(), 0);
        }

        #[test]
        fn scores_at_or_above_threshold_have_history(value in 600i64..=900) {
            prop_assert_eq!(bucket(score(value)).value(), 1);
        }

        #[test]
        fn band_agrees_with_flag(value in 300i64..=900) {
            let score = score(value);
            let has_history = bucket(score) == CreditHistoryFlag::Present;
            prop_assert_eq!(has_history, CreditBand::from_score(score) != CreditBand::Poor);
        }
    }
}
