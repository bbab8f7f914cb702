use serde::{Deserialize, Serialize};

use crate::data::{Row, Value};
use crate::palette::ResolvedSeries;

// =============================================================================
// Chart kinds
// =============================================================================

/// Top-level chart family. `Composed` mixes per-series kinds in one plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Area,
    Scatter,
    Composed,
}

// =============================================================================
// Display options
// =============================================================================

/// Axis display options, passed through to the renderer untouched apart
/// from `data_key`, which the builder points at the category field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub hide: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub position: LegendPosition,
}

impl Default for LegendOptions {
    fn default() -> Self {
        LegendOptions {
            show: true,
            position: LegendPosition::Bottom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipOptions {
    #[serde(default = "default_show")]
    pub show: bool,
    /// Shared tooltips report every series at the hovered category.
    #[serde(default)]
    pub shared: bool,
}

impl Default for TooltipOptions {
    fn default() -> Self {
        TooltipOptions {
            show: true,
            shared: false,
        }
    }
}

fn default_show() -> bool { true }

// =============================================================================
// Assembled chart spec
// =============================================================================

/// A complete, renderer-ready chart description. `data` holds one record
/// per category with the category field first; `series` carries the
/// resolved visual attributes in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub categories: Vec<Value>,
    pub data: Vec<Row>,
    pub series: Vec<ResolvedSeries>,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    pub legend: LegendOptions,
    pub tooltip: TooltipOptions,
}

impl ChartSpec {
    /// Serialize for handoff to a renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_deserialize_with_defaults() {
        let legend: LegendOptions = serde_json::from_str("{}").unwrap();
        assert!(legend.show);
        assert_eq!(legend.position, LegendPosition::Bottom);

        let legend: LegendOptions = serde_json::from_str(r#"{"position": "top"}"#).unwrap();
        assert_eq!(legend.position, LegendPosition::Top);

        let axis: AxisOptions = serde_json::from_str(r#"{"label": "Month"}"#).unwrap();
        assert_eq!(axis.label.as_deref(), Some("Month"));
        assert!(!axis.hide);
    }

    #[test]
    fn test_axis_serializes_camel_case() {
        let axis = AxisOptions {
            data_key: Some("month".to_string()),
            tick_count: Some(5),
            ..AxisOptions::default()
        };
        let json = serde_json::to_value(&axis).unwrap();
        assert_eq!(json["dataKey"], "month");
        assert_eq!(json["tickCount"], 5);
        // Unset options stay out of the payload.
        assert!(json.get("label").is_none());
    }

    #[test]
    fn test_chart_kind_round_trip() {
        let kind: ChartKind = serde_json::from_str(r#""composed""#).unwrap();
        assert_eq!(kind, ChartKind::Composed);
        assert_eq!(serde_json::to_string(&ChartKind::Bar).unwrap(), r#""bar""#);
    }
}
