use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;

/// A single cell value: string, integer, float, or timestamp.
///
/// Serializes untagged, so the renderer sees plain JSON scalars. Untagged
/// deserialization tries variants in declaration order: JSON strings stay
/// strings (timestamps enter through the typed API or CSV inference).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Time(DateTime<Utc>),
}

/// An ordered mapping from field name to value. A key absent from the map is
/// a gap, never a zero.
pub type Row = IndexMap<String, Value>;

impl Value {
    /// Infer a value from a raw CSV cell: integer, then float, then RFC 3339
    /// timestamp, then string.
    pub fn infer(raw: &str) -> Value {
        if let Ok(i) = raw.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Value::Time(t.with_timezone(&Utc));
        }
        Value::Str(raw.to_string())
    }
}

// Canonical bits for float keys: -0.0 folds into 0.0 and every NaN folds into
// the canonical NaN, so float categories hash and compare deterministically.
fn float_key_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_key_bits(*a) == float_key_bits(*b),
            (Value::Time(a), Value::Time(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Str(s) => {
                state.write_u8(0);
                s.hash(state);
            }
            Value::Int(i) => {
                state.write_u8(1);
                i.hash(state);
            }
            Value::Float(f) => {
                state.write_u8(2);
                float_key_bits(*f).hash(state);
            }
            Value::Time(t) => {
                state.write_u8(3);
                t.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Time(t) => f.write_str(&t.to_rfc3339()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

/// A record set: the caller-supplied rows a chart is built from.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub rows: Vec<Row>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Create a Frame from a JSON array of objects.
    ///
    /// Null fields become gaps (the key is simply absent from the row), bools
    /// are coerced to strings, nested arrays/objects are rejected. An empty
    /// array is a valid empty frame.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("input data must be a JSON array of objects"))?;

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("item {} in data array is not an object", idx))?;

            let mut row = Row::new();
            for (key, val) in obj {
                match val {
                    serde_json::Value::String(s) => {
                        row.insert(key.clone(), Value::Str(s.clone()));
                    }
                    serde_json::Value::Number(n) => {
                        let v = if let Some(i) = n.as_i64() {
                            Value::Int(i)
                        } else if let Some(f) = n.as_f64() {
                            Value::Float(f)
                        } else {
                            return Err(anyhow!("number out of range for field '{}'", key));
                        };
                        row.insert(key.clone(), v);
                    }
                    serde_json::Value::Bool(b) => {
                        row.insert(key.clone(), Value::Str(b.to_string()));
                    }
                    serde_json::Value::Null => {}
                    _ => return Err(anyhow!("unsupported value type for field '{}'", key)),
                }
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Create a Frame from CSV with a header row. Empty cells become gaps;
    /// non-empty cells go through [`Value::infer`].
    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .context("failed to read CSV header row")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("failed to read CSV record {}", idx))?;
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(record.iter()) {
                if cell.is_empty() {
                    continue;
                }
                row.insert(header.clone(), Value::infer(cell));
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of field names across all rows, in first-seen order.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: IndexSet<String> = IndexSet::new();
        for row in &self.rows {
            for key in row.keys() {
                names.insert(key.clone());
            }
        }
        names.into_iter().collect()
    }
}
