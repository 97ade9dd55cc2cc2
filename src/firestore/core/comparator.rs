use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::firestore::core::{OrderBy, OrderDirection, OrderSpec};
use crate::firestore::model::{DocumentRecord, ResourcePath};
use crate::firestore::value::{ArrayValue, FirestoreValue, MapValue, ValueKind};

/// Total order over documents, injected into the document index.
pub trait DocumentComparator: Send + Sync {
    fn compare(&self, left: &DocumentRecord, right: &DocumentRecord) -> Ordering;
}

impl<F> DocumentComparator for F
where
    F: Fn(&DocumentRecord, &DocumentRecord) -> Ordering + Send + Sync,
{
    fn compare(&self, left: &DocumentRecord, right: &DocumentRecord) -> Ordering {
        self(left, right)
    }
}

/// Comparator derived from a query's `order_by` clauses.
///
/// Each clause compares the field values of both documents (a missing field
/// sorts before any present value), inverted for descending clauses. Ties
/// fall through to an ascending comparison of document keys, so only a
/// document compared with itself is `Equal`.
pub struct QueryComparator {
    order_by: Vec<OrderBy>,
    comparisons: AtomicU64,
}

impl QueryComparator {
    pub fn new(spec: &OrderSpec) -> Self {
        Self {
            order_by: spec.clauses().to_vec(),
            comparisons: AtomicU64::new(0),
        }
    }

    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// Number of document comparisons performed since creation or the last reset.
    pub fn comparisons(&self) -> u64 {
        self.comparisons.load(AtomicOrdering::Relaxed)
    }

    pub fn reset_comparisons(&self) {
        self.comparisons.store(0, AtomicOrdering::Relaxed);
    }
}

impl DocumentComparator for QueryComparator {
    fn compare(&self, left: &DocumentRecord, right: &DocumentRecord) -> Ordering {
        self.comparisons.fetch_add(1, AtomicOrdering::Relaxed);

        for order in &self.order_by {
            let ordering = if order.field().is_document_id() {
                left.key().cmp(right.key())
            } else {
                compare_optional_values(left.field(order.field()), right.field(order.field()))
            };
            let ordering = match order.direction() {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        left.key().cmp(right.key())
    }
}

impl Debug for QueryComparator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryComparator")
            .field("order_by", &self.order_by)
            .field("comparisons", &self.comparisons())
            .finish()
    }
}

/// A missing field sorts before every present value, including `null`.
pub fn compare_optional_values(
    left: Option<&FirestoreValue>,
    right: Option<&FirestoreValue>,
) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => compare_values(left, right),
    }
}

/// Total order over Firestore values: first by type precedence, then within the type.
pub fn compare_values(left: &FirestoreValue, right: &FirestoreValue) -> Ordering {
    let by_type = left.type_order().cmp(&right.type_order());
    if by_type != Ordering::Equal {
        return by_type;
    }

    match (left.kind(), right.kind()) {
        (ValueKind::Null, ValueKind::Null) => Ordering::Equal,
        (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a.cmp(b),
        (ValueKind::Integer(a), ValueKind::Integer(b)) => a.cmp(b),
        (ValueKind::Double(a), ValueKind::Double(b)) => compare_doubles(*a, *b),
        (ValueKind::Integer(a), ValueKind::Double(b)) => compare_integer_to_double(*a, *b),
        (ValueKind::Double(a), ValueKind::Integer(b)) => {
            compare_integer_to_double(*b, *a).reverse()
        }
        (ValueKind::Timestamp(a), ValueKind::Timestamp(b)) => a.cmp(b),
        (ValueKind::String(a), ValueKind::String(b)) => a.as_bytes().cmp(b.as_bytes()),
        (ValueKind::Bytes(a), ValueKind::Bytes(b)) => a.as_slice().cmp(b.as_slice()),
        (ValueKind::Reference(a), ValueKind::Reference(b)) => compare_references(a, b),
        (ValueKind::GeoPoint(a), ValueKind::GeoPoint(b)) => a.compare(b),
        (ValueKind::Array(a), ValueKind::Array(b)) => compare_arrays(a, b),
        (ValueKind::Map(a), ValueKind::Map(b)) => compare_maps(a, b),
        // Same type order implies one of the pairs above.
        _ => Ordering::Equal,
    }
}

// NaN sorts below every other number; -0.0 and 0.0 are equal.
fn compare_doubles(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
    }
}

// Exact comparison: no i64 -> f64 rounding for magnitudes above 2^53.
fn compare_integer_to_double(integer: i64, double: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

    if double.is_nan() {
        return Ordering::Greater;
    }
    if double >= TWO_POW_63 {
        return Ordering::Less;
    }
    if double < -TWO_POW_63 {
        return Ordering::Greater;
    }

    let truncated = double.trunc();
    match integer.cmp(&(truncated as i64)) {
        Ordering::Equal => 0.0_f64
            .partial_cmp(&(double - truncated))
            .unwrap_or(Ordering::Equal),
        ordering => ordering,
    }
}

fn compare_references(left: &str, right: &str) -> Ordering {
    let left = ResourcePath::from_segments(left.split('/').filter(|s| !s.is_empty()));
    let right = ResourcePath::from_segments(right.split('/').filter(|s| !s.is_empty()));
    ResourcePath::comparator(&left, &right)
}

fn compare_arrays(left: &ArrayValue, right: &ArrayValue) -> Ordering {
    for (l, r) in left.values().iter().zip(right.values()) {
        let ordering = compare_values(l, r);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_maps(left: &MapValue, right: &MapValue) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in
        left.fields().iter().zip(right.fields())
    {
        let ordering = left_key
            .as_bytes()
            .cmp(right_key.as_bytes())
            .then_with(|| compare_values(left_value, right_value));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

/// Structural equality used to decide whether an update changed a document.
///
/// Unlike [`compare_values`], integers never equal doubles, `-0.0` differs
/// from `0.0` and NaN equals NaN.
pub fn value_equals(left: &FirestoreValue, right: &FirestoreValue) -> bool {
    match (left.kind(), right.kind()) {
        (ValueKind::Double(a), ValueKind::Double(b)) => {
            (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
        }
        (ValueKind::Array(a), ValueKind::Array(b)) => {
            a.len() == b.len()
                && a.values()
                    .iter()
                    .zip(b.values())
                    .all(|(l, r)| value_equals(l, r))
        }
        (ValueKind::Map(a), ValueKind::Map(b)) => map_equals(a, b),
        (a, b) => a == b,
    }
}

fn map_equals(left: &MapValue, right: &MapValue) -> bool {
    left.len() == right.len()
        && left
            .fields()
            .iter()
            .zip(right.fields())
            .all(|((lk, lv), (rk, rv))| lk == rk && value_equals(lv, rv))
}

/// Whether two records hold the same document version with the same content.
pub fn documents_equal(left: &DocumentRecord, right: &DocumentRecord) -> bool {
    left.key() == right.key()
        && left.update_time() == right.update_time()
        && left.create_time() == right.create_time()
        && map_equals(left.fields(), right.fields())
}
