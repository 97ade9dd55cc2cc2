mod comparator;
mod order_by;

pub use comparator::{
    compare_optional_values, compare_values, documents_equal, value_equals, DocumentComparator,
    QueryComparator,
};
pub use order_by::{OrderBy, OrderDirection, OrderSpec};
