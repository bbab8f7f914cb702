//! Series Color Resolution
//!
//! Resolves per-series style declarations into concrete colors. For each
//! series, the first rule that matches wins:
//!
//! 1. a pivot-color entry keyed by the series name
//! 2. an explicit color on the series style
//! 3. the next unused slot of the default palette
//!
//! Palette slots are positional: a series resolved by rule 1 or 2 does not
//! consume a slot, so the next defaulted series still receives the next
//! color in sequence. Two resolutions of the same series list always agree.

use indexmap::IndexMap;
use serde::Serialize;

use crate::series::{AxisSide, SeriesKind, SeriesStyle};

// === Default Palette ===

/// The d3 category10 palette, the de-facto default for categorical series.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// A cycling palette with a cursor over its slots.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<String>,
    cursor: usize,
}

impl ColorPalette {
    /// The default ten-color categorical palette.
    pub fn category10() -> Self {
        ColorPalette {
            colors: CATEGORY10.iter().map(|c| c.to_string()).collect(),
            cursor: 0,
        }
    }

    /// A palette over caller-supplied colors. An empty list falls back to
    /// the default palette so resolution always yields a color.
    pub fn from_colors(colors: Vec<String>) -> Self {
        if colors.is_empty() {
            return Self::category10();
        }
        ColorPalette { colors, cursor: 0 }
    }

    /// Take the next slot, wrapping when the palette is exhausted.
    pub fn next_slot(&mut self) -> String {
        let color = self.colors[self.cursor % self.colors.len()].clone();
        self.cursor += 1;
        color
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::category10()
    }
}

// === Resolved Types (no Options for visual attributes) ===

/// A series with every renderable attribute resolved to a concrete value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSeries {
    pub name: String,
    pub color: String,
    pub kind: SeriesKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub axis: AxisSide,
}

// === Resolution ===

/// Resolve every series name to a concrete color, mark kind, stack group
/// and axis. `styles` may cover any subset of the names; `default_kind`
/// fills in series that do not declare their own mark.
pub fn resolve_series(
    names: &[String],
    styles: &IndexMap<String, SeriesStyle>,
    pivot_colors: &IndexMap<String, String>,
    default_kind: SeriesKind,
    palette: &mut ColorPalette,
) -> Vec<ResolvedSeries> {
    names
        .iter()
        .map(|name| {
            let style = styles.get(name).cloned().unwrap_or_default();
            let color = pivot_colors
                .get(name)
                .cloned()
                .or(style.color)
                .unwrap_or_else(|| palette.next_slot());
            ResolvedSeries {
                name: name.clone(),
                color,
                kind: style.kind.unwrap_or(default_kind),
                stack: style.stack,
                axis: style.axis,
            }
        })
        .collect()
}
