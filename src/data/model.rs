use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{NeoError, NeoResult};

// ---------------------------------------------------------------------------
// CadResponse – the JSON body returned by the close-approach API
// ---------------------------------------------------------------------------

/// Wire shape of `cad.api`:
///
/// ```json
/// {
///   "signature": { "source": "NASA/JPL SBDB Close Approach Data API", "version": "1.5" },
///   "count": 2,
///   "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", ...],
///   "data": [["2025 AB", "3", "2460676.5", "2025-Jan-01 12:00", "0.02", ...], ...]
/// }
/// ```
///
/// `data` is omitted by the API when no approach matches the query.
#[derive(Debug, Clone, Deserialize)]
pub struct CadResponse {
    #[serde(default)]
    pub signature: Option<Signature>,
    #[serde(default)]
    pub count: Option<JsonValue>,
    pub fields: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<JsonValue>>,
}

impl CadResponse {
    /// The server's own row count. The API sends it as a string.
    pub fn declared_count(&self) -> Option<usize> {
        match self.count.as_ref()? {
            JsonValue::String(s) => s.parse().ok(),
            JsonValue::Number(n) => n.as_u64().map(|n| n as usize),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    pub source: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// CadTable – field names zipped with string cells
// ---------------------------------------------------------------------------

/// Column-named rows, every row exactly `fields.len()` wide.
#[derive(Debug, Clone, PartialEq)]
pub struct CadTable {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CadTable {
    /// Zip the response's field list with its rows, normalising cells to text.
    pub fn from_response(response: CadResponse) -> NeoResult<Self> {
        let expected = response.fields.len();
        let rows = response
            .data
            .into_iter()
            .enumerate()
            .map(|(row, cells)| {
                if cells.len() != expected {
                    return Err(NeoError::RowWidth {
                        row,
                        expected,
                        got: cells.len(),
                    });
                }
                Ok(cells.into_iter().map(cell_to_text).collect())
            })
            .collect::<NeoResult<Vec<_>>>()?;

        Ok(CadTable {
            fields: response.fields,
            rows,
        })
    }

    /// Position of a named column, if the response carries it.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn cell_to_text(val: JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// ApproachRecord – one close-approach event with derived columns
// ---------------------------------------------------------------------------

/// A single close approach (one row of the response) after derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachRecord {
    /// Primary designation, e.g. `2025 AB`.
    pub des: String,
    pub orbit_id: Option<String>,
    /// Julian date (TDB) of the approach, kept as text.
    pub jd: Option<String>,
    pub cd: NaiveDateTime,
    /// Nominal approach distance (AU).
    pub dist: f64,
    /// Minimum possible approach distance (AU).
    pub dist_min: f64,
    pub dist_max: Option<f64>,
    /// Relative velocity at approach (km/s).
    pub v_rel: Option<f64>,
    /// Velocity relative to a massless body (km/s).
    pub v_inf: Option<f64>,
    /// 3-sigma uncertainty in approach time, e.g. `< 00:01`.
    pub t_sigma_f: Option<String>,
    /// Absolute magnitude.
    pub h: Option<f64>,

    /// `dist - dist_min`. Negative values are a data anomaly and kept as-is.
    pub dist_delta: f64,
    /// `cd` rendered as `%m-%d-%y %H:%M`.
    pub cd_formatted: String,

    /// The untouched cells of the source row, aligned with `NeoDataset::fields`.
    pub raw: Vec<Option<String>>,
}

impl ApproachRecord {
    pub fn date(&self) -> NaiveDate {
        self.cd.date()
    }
}

// ---------------------------------------------------------------------------
// NeoDataset – the complete fetched and derived record set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NeoDataset {
    pub records: Vec<ApproachRecord>,
    /// Column names exactly as returned by the API.
    pub fields: Vec<String>,
    /// Resolved request URL (or file path in offline mode).
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl NeoDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Earliest and latest approach date, `None` for an empty set.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date();
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            let d = r.date();
            (lo.min(d), hi.max(d))
        }))
    }

    /// Smallest and largest `dist_min`, `None` for an empty set.
    pub fn dist_min_range(&self) -> Option<(f64, f64)> {
        range_of(self.records.iter().map(|r| r.dist_min))
    }

    /// Smallest and largest `dist_delta` over the given rows.
    pub fn delta_range(&self, indices: &[usize]) -> Option<(f64, f64)> {
        range_of(indices.iter().map(|&i| self.records[i].dist_delta))
    }
}

fn range_of(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: JsonValue) -> CadResponse {
        serde_json::from_value(value).expect("valid response shape")
    }

    #[test]
    fn zips_fields_with_rows() {
        let table = CadTable::from_response(response(json!({
            "signature": { "source": "NASA/JPL SBDB Close Approach Data API", "version": "1.5" },
            "count": "1",
            "fields": ["des", "dist", "v_inf"],
            "data": [["2025 AB", "0.02", null]]
        })))
        .unwrap();

        assert_eq!(table.fields, vec!["des", "dist", "v_inf"]);
        assert_eq!(
            table.rows,
            vec![vec![Some("2025 AB".to_string()), Some("0.02".to_string()), None]]
        );
        assert_eq!(table.column("v_inf"), Some(2));
        assert_eq!(table.column("h"), None);
    }

    #[test]
    fn missing_data_means_no_rows() {
        let table = CadTable::from_response(response(json!({
            "count": 0,
            "fields": ["des", "cd"]
        })))
        .unwrap();
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn declared_count_accepts_text_or_number() {
        let text = response(json!({"count": "12", "fields": ["des"]}));
        assert_eq!(text.declared_count(), Some(12));
        let number = response(json!({"count": 0, "fields": ["des"]}));
        assert_eq!(number.declared_count(), Some(0));
        let absent = response(json!({"fields": ["des"]}));
        assert_eq!(absent.declared_count(), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = CadTable::from_response(response(json!({
            "fields": ["des", "cd", "dist"],
            "data": [["a", "2025-01-01", "0.1"], ["b", "2025-01-02"]]
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            NeoError::RowWidth { row: 1, expected: 3, got: 2 }
        ));
    }

    #[test]
    fn numeric_cells_become_text() {
        let table = CadTable::from_response(response(json!({
            "fields": ["des", "dist"],
            "data": [["x", 0.25]]
        })))
        .unwrap();
        assert_eq!(table.rows[0][1].as_deref(), Some("0.25"));
    }
}
