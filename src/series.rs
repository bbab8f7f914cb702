use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::{Frame, Row, Value};

/// Which mark a series draws as. Single-kind charts stamp every series with
/// the chart's kind; composed charts read it per series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    #[default]
    Line,
    Area,
    Scatter,
}

/// Vertical axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

/// Per-series styling, carried through normalization unchanged. Only the
/// color participates in resolution (see [`crate::palette`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub color: Option<String>,
    /// Stacking group: series sharing a group stack on top of each other.
    pub stack: Option<String>,
    pub axis: AxisSide,
    /// Mark override, read by composed charts.
    pub kind: Option<SeriesKind>,
}

impl SeriesStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_stack(mut self, group: &str) -> Self {
        self.stack = Some(group.to_string());
        self
    }

    pub fn with_axis(mut self, side: AxisSide) -> Self {
        self.axis = side;
        self
    }

    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Sparse per-series input: series name -> (category, value) pairs, in
/// declaration order.
pub type PairSeries = IndexMap<String, Vec<(Value, Value)>>;

/// The three accepted data shapes, dispatched once at the normalizer entry.
#[derive(Debug, Clone)]
pub enum SeriesInput {
    /// One field per series, category field included.
    Wide(Vec<Row>),
    /// Long format: a pivot field names the series, a value field carries
    /// the measurement.
    Pivoted(Vec<Row>),
    /// Independent per-series arrays; category coverage may differ.
    Multi(PairSeries),
}

impl SeriesInput {
    pub fn wide(frame: Frame) -> Self {
        SeriesInput::Wide(frame.rows)
    }

    pub fn pivoted(frame: Frame) -> Self {
        SeriesInput::Pivoted(frame.rows)
    }
}

/// Which fields carry the category and, for pivoted input, the pivot and
/// value. For multi input `category_key` names the category field of the
/// output rows; the input pairs carry it implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    pub category_key: String,
    #[serde(default)]
    pub value_key: Option<String>,
    #[serde(default)]
    pub pivot_key: Option<String>,
}

impl FieldMap {
    pub fn category(key: &str) -> Self {
        FieldMap {
            category_key: key.to_string(),
            value_key: None,
            pivot_key: None,
        }
    }

    pub fn pivoted(category_key: &str, pivot_key: &str, value_key: &str) -> Self {
        FieldMap {
            category_key: category_key.to_string(),
            value_key: Some(value_key.to_string()),
            pivot_key: Some(pivot_key.to_string()),
        }
    }
}
