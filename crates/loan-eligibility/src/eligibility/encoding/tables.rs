use std::collections::{BTreeMap, BTreeSet};

use crate::eligibility::artifacts::SchemaError;
use crate::eligibility::domain::{
    Category, Dependents, Education, Gender, Married, PropertyArea, SelfEmployed,
};

use super::EncodingError;

/// Label-encoder codes for one categorical column, keyed by form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEncodingTable<C: Category> {
    codes: BTreeMap<C, i64>,
}

impl<C: Category> Default for CategoryEncodingTable<C> {
    fn default() -> Self {
        Self {
            codes: BTreeMap::new(),
        }
    }
}

impl<C: Category> CategoryEncodingTable<C> {
    /// Build from a label encoder's class list; a class's code is its position.
    pub fn from_classes<S: AsRef<str>>(classes: &[S]) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        let mut codes = BTreeMap::new();

        for (position, class) in classes.iter().enumerate() {
            let class = class.as_ref();
            if !seen.insert(class) {
                return Err(SchemaError::DuplicateClass {
                    column: C::FIELD.column_name(),
                    class: class.to_string(),
                });
            }

            match C::from_label(class) {
                Some(value) => {
                    codes.insert(value, position as i64);
                }
                None => tracing::warn!(
                    column = C::FIELD.column_name(),
                    class,
                    "encoder class has no matching form value; ignoring"
                ),
            }
        }

        Ok(Self { codes })
    }

    pub fn code(&self, value: C) -> Option<i64> {
        self.codes.get(&value).copied()
    }

    pub fn encode(&self, value: C) -> Result<i64, EncodingError> {
        self.code(value)
            .ok_or_else(|| EncodingError::UnknownCategory {
                field: C::FIELD,
                value: value.label().to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// The six categorical tables, one per form select list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTables {
    pub gender: CategoryEncodingTable<Gender>,
    pub married: CategoryEncodingTable<Married>,
    pub dependents: CategoryEncodingTable<Dependents>,
    pub education: CategoryEncodingTable<Education>,
    pub self_employed: CategoryEncodingTable<SelfEmployed>,
    pub property_area: CategoryEncodingTable<PropertyArea>,
}
