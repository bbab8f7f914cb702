// Library exports for chartspec

pub mod builder;
pub mod data;
pub mod error;
pub mod normalize;
pub mod palette;
pub mod series;
pub mod spec;

pub use builder::ChartBuilder;
pub use data::{Frame, Row, Value};
pub use error::{NormalizeError, Result};
pub use normalize::{normalize, NormalizedData};
pub use palette::{ColorPalette, ResolvedSeries, CATEGORY10};
pub use series::{AxisSide, FieldMap, PairSeries, SeriesInput, SeriesKind, SeriesStyle};
pub use spec::{AxisOptions, ChartKind, ChartSpec, LegendOptions, LegendPosition, TooltipOptions};

use indexmap::IndexMap;
use serde::Deserialize;

/// How the input rows encode their series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum InputShape {
    #[serde(rename = "wide")]
    #[default]
    Wide,
    #[serde(rename = "pivoted")]
    Pivoted,
    #[serde(rename = "multi")]
    Multi,
}

/// Declarative chart description, typically loaded from a JSON file. Every
/// field is optional; an empty object describes a wide bar chart keyed on
/// "category".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub shape: InputShape,
    #[serde(default = "default_category_key")]
    pub category_key: String,
    #[serde(default)]
    pub pivot_key: Option<String>,
    #[serde(default)]
    pub value_key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub series: IndexMap<String, SeriesStyle>,
    #[serde(default)]
    pub pivot_colors: IndexMap<String, String>,
    #[serde(default)]
    pub palette: Vec<String>,
    #[serde(default)]
    pub x_axis: AxisOptions,
    #[serde(default)]
    pub y_axis: AxisOptions,
    #[serde(default)]
    pub legend: LegendOptions,
    #[serde(default)]
    pub tooltip: TooltipOptions,
}

fn default_category_key() -> String { "category".to_string() }

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            kind: ChartKind::Bar,
            shape: InputShape::Wide,
            category_key: default_category_key(),
            pivot_key: None,
            value_key: None,
            title: None,
            series: IndexMap::new(),
            pivot_colors: IndexMap::new(),
            palette: Vec::new(),
            x_axis: AxisOptions::default(),
            y_axis: AxisOptions::default(),
            legend: LegendOptions::default(),
            tooltip: TooltipOptions::default(),
        }
    }
}

impl ChartConfig {
    /// The field mapping this config declares.
    pub fn mapping(&self) -> FieldMap {
        FieldMap {
            category_key: self.category_key.clone(),
            value_key: self.value_key.clone(),
            pivot_key: self.pivot_key.clone(),
        }
    }

    /// Turn the declarative config into a builder over already-loaded input.
    /// The caller is responsible for loading the data in the shape the
    /// config's `shape` field announces.
    pub fn into_builder(self, input: SeriesInput) -> ChartBuilder {
        let mapping = self.mapping();
        let mut builder = ChartBuilder::new(self.kind, input, mapping);
        for (name, style) in self.series {
            builder = builder.series(&name, style);
        }
        for (value, color) in self.pivot_colors {
            builder = builder.pivot_color(&value, &color);
        }
        if !self.palette.is_empty() {
            builder = builder.palette(ColorPalette::from_colors(self.palette));
        }
        if let Some(title) = self.title {
            builder = builder.title(&title);
        }
        builder
            .x_axis(self.x_axis)
            .y_axis(self.y_axis)
            .legend(self.legend)
            .tooltip(self.tooltip)
    }
}
