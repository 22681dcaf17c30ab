//! Typed query-filter parameters for product listings.
//!
//! Each supported request parameter maps to one `ProductParam` variant
//! bound to a typed value, so unsupported or misspelled field names can
//! never reach the SQL layer. Predicates combine with logical AND; an
//! absent parameter imposes no constraint.

use thiserror::Error;

/// Filter parsing errors.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A numeric comparison parameter carried a non-numeric value.
    /// These fail loudly instead of being dropped.
    #[error("invalid value for '{param}': '{value}' is not an integer")]
    InvalidNumber { param: String, value: String },
}

/// One recognized filter predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductParam {
    /// `name` starts with the value (case-sensitive).
    NamePrefix(String),
    /// The related category's `name` starts with the value.
    CategoryNamePrefix(String),
    /// `cost >= value`.
    MinCost(i64),
    /// `cost <= value`.
    MaxCost(i64),
    /// `quantity >= value`.
    MinQuantity(i64),
    /// `quantity <= value`.
    MaxQuantity(i64),
    /// `status` equals the value exactly. Unknown status strings are
    /// legal and simply match nothing.
    StatusEq(String),
}

/// Accumulated product filter.
///
/// The filter is a lazy description of predicates: building one never
/// touches the store, and the store renders the whole set into a single
/// query per terminal read. Predicates can be appended incrementally in
/// any order.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    params: Vec<ProductParam>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from request query pairs.
    ///
    /// Unrecognized parameter names are ignored without error; invalid
    /// numeric values for recognized parameters are not.
    pub fn from_query<'a, I>(pairs: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::new();
        for (name, value) in pairs {
            match name {
                "name" => filter = filter.name_prefix(value),
                "category_name" => filter = filter.category_name_prefix(value),
                "min_cost" => filter = filter.min_cost(parse_int(name, value)?),
                "max_cost" => filter = filter.max_cost(parse_int(name, value)?),
                "min_quantity" => filter = filter.min_quantity(parse_int(name, value)?),
                "max_quantity" => filter = filter.max_quantity(parse_int(name, value)?),
                "status" => filter = filter.status_eq(value),
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.params.push(ProductParam::NamePrefix(prefix.into()));
        self
    }

    pub fn category_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.params
            .push(ProductParam::CategoryNamePrefix(prefix.into()));
        self
    }

    pub fn min_cost(mut self, value: i64) -> Self {
        self.params.push(ProductParam::MinCost(value));
        self
    }

    pub fn max_cost(mut self, value: i64) -> Self {
        self.params.push(ProductParam::MaxCost(value));
        self
    }

    pub fn min_quantity(mut self, value: i64) -> Self {
        self.params.push(ProductParam::MinQuantity(value));
        self
    }

    pub fn max_quantity(mut self, value: i64) -> Self {
        self.params.push(ProductParam::MaxQuantity(value));
        self
    }

    pub fn status_eq(mut self, status: impl Into<String>) -> Self {
        self.params.push(ProductParam::StatusEq(status.into()));
        self
    }

    /// The accumulated predicates, in insertion order.
    pub fn params(&self) -> &[ProductParam] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

fn parse_int(param: &str, value: &str) -> Result<i64, FilterError> {
    value.parse::<i64>().map_err(|_| FilterError::InvalidNumber {
        param: param.to_string(),
        value: value.to_string(),
    })
}
