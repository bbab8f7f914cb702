//! Declarative chart builders. Each constructor pairs a chart kind with an
//! input shape; fluent methods layer on configuration; `build` runs the
//! normalizer, resolves series colors, and assembles the final `ChartSpec`.

use indexmap::IndexMap;

use crate::data::Frame;
use crate::error::Result;
use crate::normalize::normalize;
use crate::palette::{resolve_series, ColorPalette};
use crate::series::{FieldMap, PairSeries, SeriesInput, SeriesKind, SeriesStyle};
use crate::spec::{AxisOptions, ChartKind, ChartSpec, LegendOptions, TooltipOptions};

/// Builder for a single chart. Consumed by `build`.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    kind: ChartKind,
    input: SeriesInput,
    mapping: FieldMap,
    title: Option<String>,
    styles: IndexMap<String, SeriesStyle>,
    pivot_colors: IndexMap<String, String>,
    palette: ColorPalette,
    x_axis: AxisOptions,
    y_axis: AxisOptions,
    legend: LegendOptions,
    tooltip: TooltipOptions,
}

/// The mark drawn for series that do not declare their own kind.
fn default_series_kind(kind: ChartKind) -> SeriesKind {
    match kind {
        ChartKind::Bar => SeriesKind::Bar,
        ChartKind::Line => SeriesKind::Line,
        ChartKind::Area => SeriesKind::Area,
        ChartKind::Scatter => SeriesKind::Scatter,
        ChartKind::Composed => SeriesKind::Line,
    }
}

impl ChartBuilder {
    pub(crate) fn new(kind: ChartKind, input: SeriesInput, mapping: FieldMap) -> Self {
        ChartBuilder {
            kind,
            input,
            mapping,
            title: None,
            styles: IndexMap::new(),
            pivot_colors: IndexMap::new(),
            palette: ColorPalette::category10(),
            x_axis: AxisOptions::default(),
            y_axis: AxisOptions::default(),
            legend: LegendOptions::default(),
            tooltip: TooltipOptions::default(),
        }
    }

    // === Wide constructors: one field per series, category field included ===

    pub fn bar(data: Frame, category_key: &str) -> Self {
        Self::new(ChartKind::Bar, SeriesInput::wide(data), FieldMap::category(category_key))
    }

    pub fn line(data: Frame, category_key: &str) -> Self {
        Self::new(ChartKind::Line, SeriesInput::wide(data), FieldMap::category(category_key))
    }

    pub fn area(data: Frame, category_key: &str) -> Self {
        Self::new(ChartKind::Area, SeriesInput::wide(data), FieldMap::category(category_key))
    }

    pub fn scatter(data: Frame, category_key: &str) -> Self {
        Self::new(ChartKind::Scatter, SeriesInput::wide(data), FieldMap::category(category_key))
    }

    pub fn composed(data: Frame, category_key: &str) -> Self {
        Self::new(ChartKind::Composed, SeriesInput::wide(data), FieldMap::category(category_key))
    }

    // === Pivoted constructors: long rows, one series per pivot value ===

    pub fn bar_pivoted(data: Frame, category_key: &str, pivot_key: &str, value_key: &str) -> Self {
        Self::new(
            ChartKind::Bar,
            SeriesInput::pivoted(data),
            FieldMap::pivoted(category_key, pivot_key, value_key),
        )
    }

    pub fn line_pivoted(data: Frame, category_key: &str, pivot_key: &str, value_key: &str) -> Self {
        Self::new(
            ChartKind::Line,
            SeriesInput::pivoted(data),
            FieldMap::pivoted(category_key, pivot_key, value_key),
        )
    }

    pub fn area_pivoted(data: Frame, category_key: &str, pivot_key: &str, value_key: &str) -> Self {
        Self::new(
            ChartKind::Area,
            SeriesInput::pivoted(data),
            FieldMap::pivoted(category_key, pivot_key, value_key),
        )
    }

    pub fn scatter_pivoted(
        data: Frame,
        category_key: &str,
        pivot_key: &str,
        value_key: &str,
    ) -> Self {
        Self::new(
            ChartKind::Scatter,
            SeriesInput::pivoted(data),
            FieldMap::pivoted(category_key, pivot_key, value_key),
        )
    }

    pub fn composed_pivoted(
        data: Frame,
        category_key: &str,
        pivot_key: &str,
        value_key: &str,
    ) -> Self {
        Self::new(
            ChartKind::Composed,
            SeriesInput::pivoted(data),
            FieldMap::pivoted(category_key, pivot_key, value_key),
        )
    }

    // === Multi constructors: independent sparse (category, value) arrays ===

    pub fn bar_multi(category_key: &str, series: PairSeries) -> Self {
        Self::new(ChartKind::Bar, SeriesInput::Multi(series), FieldMap::category(category_key))
    }

    pub fn line_multi(category_key: &str, series: PairSeries) -> Self {
        Self::new(ChartKind::Line, SeriesInput::Multi(series), FieldMap::category(category_key))
    }

    pub fn area_multi(category_key: &str, series: PairSeries) -> Self {
        Self::new(ChartKind::Area, SeriesInput::Multi(series), FieldMap::category(category_key))
    }

    pub fn scatter_multi(category_key: &str, series: PairSeries) -> Self {
        Self::new(ChartKind::Scatter, SeriesInput::Multi(series), FieldMap::category(category_key))
    }

    pub fn composed_multi(category_key: &str, series: PairSeries) -> Self {
        Self::new(
            ChartKind::Composed,
            SeriesInput::Multi(series),
            FieldMap::category(category_key),
        )
    }

    // === Fluent configuration ===

    /// Declare style for a series by name. Names that never appear in the
    /// data are ignored at build time.
    pub fn series(mut self, name: &str, style: SeriesStyle) -> Self {
        self.styles.insert(name.to_string(), style);
        self
    }

    /// Pin a color to a pivot value (= series name in pivoted mode). Takes
    /// precedence over everything else.
    pub fn pivot_color(mut self, value: &str, color: &str) -> Self {
        self.pivot_colors.insert(value.to_string(), color.to_string());
        self
    }

    /// Replace the default palette for slot-assigned colors.
    pub fn palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn x_axis(mut self, options: AxisOptions) -> Self {
        self.x_axis = options;
        self
    }

    pub fn y_axis(mut self, options: AxisOptions) -> Self {
        self.y_axis = options;
        self
    }

    pub fn legend(mut self, options: LegendOptions) -> Self {
        self.legend = options;
        self
    }

    pub fn tooltip(mut self, options: TooltipOptions) -> Self {
        self.tooltip = options;
        self
    }

    // === Assembly ===

    /// Normalize the input, resolve per-series visuals, and produce the
    /// renderer-ready chart spec.
    pub fn build(self) -> Result<ChartSpec> {
        let normalized = normalize(&self.input, &self.mapping)?;

        let mut palette = self.palette;
        let series = resolve_series(
            &normalized.series_names,
            &self.styles,
            &self.pivot_colors,
            default_series_kind(self.kind),
            &mut palette,
        );

        let mut x_axis = self.x_axis;
        if x_axis.data_key.is_none() {
            x_axis.data_key = Some(self.mapping.category_key.clone());
        }

        Ok(ChartSpec {
            kind: self.kind,
            title: self.title,
            categories: normalized.categories,
            data: normalized.rows,
            series,
            x_axis,
            y_axis: self.y_axis,
            legend: self.legend,
            tooltip: self.tooltip,
        })
    }
}
