use std::fmt;

use serde::{Deserialize, Serialize};

use super::artifacts::SchemaError;

/// Verdict domain of the model's target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredictionLabel {
    Approved,
    Rejected,
}

impl PredictionLabel {
    /// Target value in the training data (`Loan_Status`).
    pub const fn training_class(self) -> &'static str {
        match self {
            PredictionLabel::Approved => "Y",
            PredictionLabel::Rejected => "N",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PredictionLabel::Approved => "Approved",
            PredictionLabel::Rejected => "Rejected",
        }
    }

    pub const fn is_approved(self) -> bool {
        matches!(self, PredictionLabel::Approved)
    }
}

impl fmt::Display for PredictionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("classifier returned label code {code}, which the status encoder never assigned")]
    UnknownLabelCode { code: i64 },
}

/// Codes the status encoder assigned to "Y" and "N".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelTable {
    approved: i64,
    rejected: i64,
}

impl LabelTable {
    /// Build from the status encoder's class list; exactly "N" and "Y" are accepted.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Result<Self, SchemaError> {
        let position = |label: PredictionLabel| {
            classes
                .iter()
                .position(|class| class.as_ref() == label.training_class())
        };

        match (
            classes.len(),
            position(PredictionLabel::Approved),
            position(PredictionLabel::Rejected),
        ) {
            (2, Some(approved), Some(rejected)) => Ok(Self {
                approved: approved as i64,
                rejected: rejected as i64,
            }),
            _ => Err(SchemaError::LabelClasses {
                found: classes
                    .iter()
                    .map(|class| class.as_ref().to_string())
                    .collect(),
            }),
        }
    }

    pub fn code_for(&self, label: PredictionLabel) -> i64 {
        match label {
            PredictionLabel::Approved => self.approved,
            PredictionLabel::Rejected => self.rejected,
        }
    }

    pub fn decode(&self, code: i64) -> Result<PredictionLabel, DecodeError> {
        if code == self.approved {
            Ok(PredictionLabel::Approved)
        } else if code == self.rejected {
            Ok(PredictionLabel::Rejected)
        } else {
            Err(DecodeError::UnknownLabelCode { code })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_inverts_status_encoder_codes() {
        let table = LabelTable::from_classes(&["N", "Y"]).expect("valid classes");

        assert_eq!(table.code_for(PredictionLabel::Rejected), 0);
        assert_eq!(table.code_for(PredictionLabel::Approved), 1);
        assert_eq!(table.decode(0), Ok(PredictionLabel::Rejected));
        assert_eq!(table.decode(1), Ok(PredictionLabel::Approved));
    }

    #[test]
    fn decode_follows_class_order_of_the_artifact() {
        let table = LabelTable::from_classes(&["Y", "N"]).expect("valid classes");
        assert_eq!(table.decode(0), Ok(PredictionLabel::Approved));
        assert_eq!(table.decode(1), Ok(PredictionLabel::Rejected));
    }

    #[test]
    fn unassigned_codes_are_errors_not_defaults() {
        let table = LabelTable::from_classes(&["N", "Y"]).expect("valid classes");

        for code in [-1, 2, 42] {
            assert_eq!(
                table.decode(code),
                Err(DecodeError::UnknownLabelCode { code })
            );
        }
    }

    #[test]
    fn status_encoder_must_hold_exactly_y_and_n() {
        for classes in [vec!["N"], vec!["N", "Y", "M"], vec!["No", "Yes"], vec!["Y", "Y"]] {
            assert!(matches!(
                LabelTable::from_classes(&classes),
                Err(SchemaError::LabelClasses { .. })
            ));
        }
    }
}
