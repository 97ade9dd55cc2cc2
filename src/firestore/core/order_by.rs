use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::firestore::error::{invalid_argument, FirestoreResult};
use crate::firestore::model::{FieldPath, IntoFieldPath};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        }
    }
}

/// One `order_by` clause of a query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderBy {
    field: FieldPath,
    direction: OrderDirection,
}

impl OrderBy {
    pub fn new(field: FieldPath, direction: OrderDirection) -> Self {
        Self { field, direction }
    }

    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

/// Validated, ordered list of `order_by` clauses.
///
/// Every spec ends with an implicit ascending tie-break on the document key,
/// so two distinct documents never compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderSpec {
    clauses: Vec<OrderBy>,
}

impl OrderSpec {
    pub fn new(clauses: Vec<OrderBy>) -> FirestoreResult<Self> {
        let mut seen = BTreeSet::new();
        for (position, clause) in clauses.iter().enumerate() {
            if !seen.insert(clause.field()) {
                return Err(invalid_argument(format!(
                    "Invalid order_by: field \"{}\" is ordered more than once",
                    clause.field()
                )));
            }
            if clause.field().is_document_id() && position + 1 != clauses.len() {
                return Err(invalid_argument(format!(
                    "Invalid order_by: \"{}\" must be the last ordering clause",
                    clause.field()
                )));
            }
        }
        Ok(Self { clauses })
    }

    /// Spec with no explicit clauses: results are ordered by document key.
    pub fn by_document_key() -> Self {
        Self::default()
    }

    /// Appends a clause, re-validating the whole spec.
    pub fn then<F>(self, field: F, direction: OrderDirection) -> FirestoreResult<Self>
    where
        F: IntoFieldPath,
    {
        let mut clauses = self.clauses;
        clauses.push(OrderBy::new(field.into_field_path()?, direction));
        Self::new(clauses)
    }

    pub fn clauses(&self) -> &[OrderBy] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl Display for OrderSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        if rendered.is_empty() {
            f.write_str("__name__ asc")
        } else {
            write!(f, "{}, __name__ asc", rendered.join(", "))
        }
    }
}
