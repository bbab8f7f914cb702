//! The series normalizer: turns any accepted input shape into one row per
//! category, with one field per series and gaps kept absent.

use indexmap::{IndexMap, IndexSet};
use tracing::warn;

use crate::data::{Row, Value};
use crate::error::{NormalizeError, Result};
use crate::series::{FieldMap, PairSeries, SeriesInput};

/// Normalized series data: unioned categories in first-seen order, one row
/// per category, and the derived series names.
///
/// Invariants: no category is duplicated, category order is deterministic for
/// a given input order, and every series name is a field of every row
/// (possibly absent).
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedData {
    pub categories: Vec<Value>,
    pub rows: Vec<Row>,
    pub series_names: Vec<String>,
}

/// Main entry point: dispatch on the input shape and produce renderer-ready
/// rows. Pure function of its inputs; nothing is mutated or retained.
pub fn normalize(input: &SeriesInput, mapping: &FieldMap) -> Result<NormalizedData> {
    match input {
        SeriesInput::Wide(rows) => normalize_wide(rows, &mapping.category_key),
        SeriesInput::Pivoted(rows) => {
            let pivot_key = mapping
                .pivot_key
                .as_deref()
                .ok_or(NormalizeError::MissingMapping { key: "pivot_key" })?;
            let value_key = mapping
                .value_key
                .as_deref()
                .ok_or(NormalizeError::MissingMapping { key: "value_key" })?;
            normalize_pivoted(rows, &mapping.category_key, pivot_key, value_key)
        }
        SeriesInput::Multi(series) => Ok(normalize_multi(series, &mapping.category_key)),
    }
}

/// Wide rows already carry one field per series. Categories keep first-seen
/// order; series names are the union of non-category fields across all rows.
/// Rows sharing a category merge field-wise, later values overwriting earlier.
fn normalize_wide(rows: &[Row], category_key: &str) -> Result<NormalizedData> {
    let mut merged: IndexMap<Value, Row> = IndexMap::new();
    let mut series_names: IndexSet<String> = IndexSet::new();

    for (idx, row) in rows.iter().enumerate() {
        let category = row
            .get(category_key)
            .ok_or_else(|| NormalizeError::missing_field(idx, category_key))?;

        let slot = merged.entry(category.clone()).or_default();
        for (key, value) in row {
            if key == category_key {
                continue;
            }
            series_names.insert(key.clone());
            slot.insert(key.clone(), value.clone());
        }
    }

    Ok(assemble(category_key, merged, series_names))
}

/// Long format: every input row contributes one (category, series, value)
/// triple. Duplicate (category, series) pairs resolve last-write-wins and are
/// flagged as a data-quality signal.
fn normalize_pivoted(
    rows: &[Row],
    category_key: &str,
    pivot_key: &str,
    value_key: &str,
) -> Result<NormalizedData> {
    let mut merged: IndexMap<Value, Row> = IndexMap::new();
    let mut series_names: IndexSet<String> = IndexSet::new();

    for (idx, row) in rows.iter().enumerate() {
        let category = row
            .get(category_key)
            .ok_or_else(|| NormalizeError::missing_field(idx, category_key))?;
        let pivot = row
            .get(pivot_key)
            .ok_or_else(|| NormalizeError::missing_field(idx, pivot_key))?;
        let value = row
            .get(value_key)
            .ok_or_else(|| NormalizeError::missing_field(idx, value_key))?;

        let name = pivot.to_string();
        series_names.insert(name.clone());

        let slot = merged.entry(category.clone()).or_default();
        if slot.insert(name.clone(), value.clone()).is_some() {
            warn!(
                category = %category,
                series = %name,
                row = idx,
                "duplicate (category, series) pair, keeping the later value"
            );
        }
    }

    Ok(assemble(category_key, merged, series_names))
}

/// Sparse per-series arrays. The category axis is the union across series,
/// ordered by first appearance scanning series in declaration order, then
/// within each series in array order. A series without an entry for a
/// category leaves the field absent so the renderer draws a break.
fn normalize_multi(series: &PairSeries, category_key: &str) -> NormalizedData {
    let mut categories: IndexSet<Value> = IndexSet::new();
    let mut lookups: Vec<(String, IndexMap<Value, Value>)> = Vec::with_capacity(series.len());

    for (name, points) in series {
        let mut lookup = IndexMap::with_capacity(points.len());
        for (category, value) in points {
            categories.insert(category.clone());
            lookup.insert(category.clone(), value.clone());
        }
        lookups.push((name.clone(), lookup));
    }

    let series_names: Vec<String> = lookups.iter().map(|(name, _)| name.clone()).collect();
    let mut out_categories = Vec::with_capacity(categories.len());
    let mut rows = Vec::with_capacity(categories.len());

    for category in categories {
        let mut row = Row::with_capacity(series_names.len() + 1);
        row.insert(category_key.to_string(), category.clone());
        for (name, lookup) in &lookups {
            if let Some(value) = lookup.get(&category) {
                row.insert(name.clone(), value.clone());
            }
        }
        out_categories.push(category);
        rows.push(row);
    }

    NormalizedData {
        categories: out_categories,
        rows,
        series_names,
    }
}

/// Build the output rows in canonical field order: category first, then
/// series fields in resolved order, gaps omitted.
fn assemble(
    category_key: &str,
    merged: IndexMap<Value, Row>,
    series_names: IndexSet<String>,
) -> NormalizedData {
    let series_names: Vec<String> = series_names.into_iter().collect();
    let mut categories = Vec::with_capacity(merged.len());
    let mut rows = Vec::with_capacity(merged.len());

    for (category, fields) in merged {
        let mut row = Row::with_capacity(series_names.len() + 1);
        row.insert(category_key.to_string(), category.clone());
        for name in &series_names {
            if let Some(value) = fields.get(name) {
                row.insert(name.clone(), value.clone());
            }
        }
        categories.push(category);
        rows.push(row);
    }

    NormalizedData {
        categories,
        rows,
        series_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, Value)]) -> Row {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sales_long() -> Vec<Row> {
        vec![
            row(&[
                ("month", "Jan".into()),
                ("region", "North".into()),
                ("sales", 100.into()),
            ]),
            row(&[
                ("month", "Jan".into()),
                ("region", "South".into()),
                ("sales", 80.into()),
            ]),
        ]
    }

    #[test]
    fn test_wide_basic() {
        let input = SeriesInput::Wide(vec![
            row(&[("month", "Jan".into()), ("sales", 100.into()), ("profit", 20.into())]),
            row(&[("month", "Feb".into()), ("sales", 90.into())]),
        ]);
        let out = normalize(&input, &FieldMap::category("month")).unwrap();

        assert_eq!(out.categories, vec![Value::from("Jan"), Value::from("Feb")]);
        assert_eq!(out.series_names, vec!["sales", "profit"]);
        assert_eq!(out.rows[0]["profit"], Value::Int(20));
        // Feb has no profit entry: gap, not zero.
        assert!(out.rows[1].get("profit").is_none());
        assert_eq!(out.rows[1]["month"], Value::from("Feb"));
    }

    #[test]
    fn test_wide_series_union_across_rows() {
        // A series appearing only in a later row still becomes a column.
        let input = SeriesInput::Wide(vec![
            row(&[("x", 1.into()), ("a", 10.into())]),
            row(&[("x", 2.into()), ("b", 20.into())]),
        ]);
        let out = normalize(&input, &FieldMap::category("x")).unwrap();
        assert_eq!(out.series_names, vec!["a", "b"]);
        assert!(out.rows[0].get("b").is_none());
        assert!(out.rows[1].get("a").is_none());
    }

    #[test]
    fn test_wide_duplicate_category_merges_last_write_wins() {
        let input = SeriesInput::Wide(vec![
            row(&[("x", "Jan".into()), ("a", 1.into())]),
            row(&[("x", "Jan".into()), ("a", 2.into()), ("b", 3.into())]),
        ]);
        let out = normalize(&input, &FieldMap::category("x")).unwrap();
        assert_eq!(out.categories.len(), 1);
        assert_eq!(out.rows[0]["a"], Value::Int(2));
        assert_eq!(out.rows[0]["b"], Value::Int(3));
    }

    #[test]
    fn test_wide_order_stable_across_runs() {
        let input = SeriesInput::Wide(vec![
            row(&[("x", "zebra".into()), ("v", 1.into())]),
            row(&[("x", "apple".into()), ("v", 2.into())]),
            row(&[("x", "mango".into()), ("v", 3.into())]),
        ]);
        let mapping = FieldMap::category("x");
        let first = normalize(&input, &mapping).unwrap();
        let second = normalize(&input, &mapping).unwrap();
        // First-seen order, not sorted, and identical on rerun.
        assert_eq!(
            first.categories,
            vec![Value::from("zebra"), Value::from("apple"), Value::from("mango")]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_wide_missing_category_field() {
        let input = SeriesInput::Wide(vec![
            row(&[("month", "Jan".into()), ("sales", 1.into())]),
            row(&[("sales", 2.into())]),
        ]);
        let err = normalize(&input, &FieldMap::category("month")).unwrap_err();
        assert_eq!(err, NormalizeError::missing_field(1, "month"));
    }

    #[test]
    fn test_pivot_round_trip() {
        let input = SeriesInput::Pivoted(sales_long());
        let out = normalize(&input, &FieldMap::pivoted("month", "region", "sales")).unwrap();

        assert_eq!(out.categories, vec![Value::from("Jan")]);
        assert_eq!(out.series_names, vec!["North", "South"]);
        assert_eq!(
            out.rows[0],
            row(&[
                ("month", "Jan".into()),
                ("North", 100.into()),
                ("South", 80.into()),
            ])
        );
    }

    #[test]
    fn test_pivot_last_write_wins() {
        let mut rows = sales_long();
        rows.push(row(&[
            ("month", "Jan".into()),
            ("region", "North".into()),
            ("sales", 20.into()),
        ]));
        let input = SeriesInput::Pivoted(rows);
        let out = normalize(&input, &FieldMap::pivoted("month", "region", "sales")).unwrap();
        assert_eq!(out.rows[0]["North"], Value::Int(20));
        // Still a single category and two series.
        assert_eq!(out.categories.len(), 1);
        assert_eq!(out.series_names.len(), 2);
    }

    #[test]
    fn test_pivot_missing_field_names_row() {
        let mut rows = sales_long();
        rows.push(row(&[("month", "Feb".into()), ("sales", 5.into())]));
        let input = SeriesInput::Pivoted(rows);
        let err = normalize(&input, &FieldMap::pivoted("month", "region", "sales")).unwrap_err();
        assert_eq!(err, NormalizeError::missing_field(2, "region"));
    }

    #[test]
    fn test_pivot_requires_mapping_keys() {
        let input = SeriesInput::Pivoted(sales_long());
        let err = normalize(&input, &FieldMap::category("month")).unwrap_err();
        assert_eq!(err, NormalizeError::MissingMapping { key: "pivot_key" });
    }

    #[test]
    fn test_pivot_numeric_pivot_value_becomes_name() {
        let input = SeriesInput::Pivoted(vec![row(&[
            ("month", "Jan".into()),
            ("year", 2024.into()),
            ("sales", 10.into()),
        ])]);
        let out = normalize(&input, &FieldMap::pivoted("month", "year", "sales")).unwrap();
        assert_eq!(out.series_names, vec!["2024"]);
    }

    #[test]
    fn test_multi_union_and_gaps() {
        let mut series = PairSeries::new();
        series.insert(
            "A".to_string(),
            vec![("Jan".into(), 1.into()), ("Mar".into(), 3.into())],
        );
        series.insert(
            "B".to_string(),
            vec![("Jan".into(), 4.into()), ("Feb".into(), 5.into())],
        );
        let input = SeriesInput::Multi(series);
        let out = normalize(&input, &FieldMap::category("month")).unwrap();

        // Union order: A's categories first, then B's unseen ones.
        assert_eq!(
            out.categories,
            vec![Value::from("Jan"), Value::from("Mar"), Value::from("Feb")]
        );
        assert_eq!(out.series_names, vec!["A", "B"]);

        let feb = &out.rows[2];
        assert!(feb.get("A").is_none());
        assert_eq!(feb["B"], Value::Int(5));
        let mar = &out.rows[1];
        assert_eq!(mar["A"], Value::Int(3));
        assert!(mar.get("B").is_none());
    }

    #[test]
    fn test_multi_declared_empty_series_is_listed() {
        let mut series = PairSeries::new();
        series.insert("A".to_string(), vec![("Jan".into(), 1.into())]);
        series.insert("B".to_string(), vec![]);
        let out = normalize(&SeriesInput::Multi(series), &FieldMap::category("month")).unwrap();
        assert_eq!(out.series_names, vec!["A", "B"]);
        assert!(out.rows[0].get("B").is_none());
    }

    #[test]
    fn test_empty_inputs() {
        let empty = NormalizedData {
            categories: vec![],
            rows: vec![],
            series_names: vec![],
        };
        let wide = normalize(&SeriesInput::Wide(vec![]), &FieldMap::category("x")).unwrap();
        assert_eq!(wide, empty);
        let pivoted = normalize(
            &SeriesInput::Pivoted(vec![]),
            &FieldMap::pivoted("x", "p", "v"),
        )
        .unwrap();
        assert_eq!(pivoted, empty);
        let multi = normalize(&SeriesInput::Multi(PairSeries::new()), &FieldMap::category("x"))
            .unwrap();
        assert_eq!(multi, empty);
    }

    #[test]
    fn test_row_field_order_is_canonical() {
        // Category field first, then series in resolved order, regardless of
        // the order fields appeared in the source rows.
        let input = SeriesInput::Wide(vec![
            row(&[("b", 2.into()), ("x", "Jan".into()), ("a", 1.into())]),
        ]);
        let out = normalize(&input, &FieldMap::category("x")).unwrap();
        let keys: Vec<&String> = out.rows[0].keys().collect();
        assert_eq!(keys, vec!["x", "b", "a"]);
    }
}
