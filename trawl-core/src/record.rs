use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder written for any field that could not be read.
pub const SENTINEL: &str = "N/A";

/// One extracted field: either read successfully or missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Value(T),
    Missing,
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Missing => None,
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Field::Missing, Field::Value)
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => v.fmt(f),
            Field::Missing => f.write_str(SENTINEL),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::Missing => serializer.serialize_str(SENTINEL),
        }
    }
}

/// A single review, flattened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    #[serde(rename = "user_name")]
    pub author: Field<String>,
    pub rating: Field<f64>,
    #[serde(rename = "review_date")]
    pub date: Field<String>,
    #[serde(rename = "review_text")]
    pub text: Field<String>,
    /// Newline-joined `label: value` pairs, empty when the review has none.
    #[serde(rename = "additional_info")]
    pub extras: String,
}

impl ReviewRecord {
    /// Column names, in [`ReviewRecord::to_row`] order.
    pub const COLUMNS: [&'static str; 5] = [
        "user_name",
        "rating",
        "review_date",
        "review_text",
        "additional_info",
    ];

    /// Render as table cells, sentinels included.
    pub fn to_row(&self) -> Vec<String> {
        let rating = match &self.rating {
            Field::Value(r) => format_rating(*r),
            Field::Missing => SENTINEL.to_string(),
        };
        vec![
            self.author.to_string(),
            rating,
            self.date.to_string(),
            self.text.to_string(),
            self.extras.clone(),
        ]
    }
}

/// Whole ratings keep one decimal place (`5.0`), others print as-is.
fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{rating:.1}")
    } else {
        rating.to_string()
    }
}

/// Records in on-page order.
pub type ExtractionBatch = Vec<ReviewRecord>;
