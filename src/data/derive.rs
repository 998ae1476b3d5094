use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::model::{ApproachRecord, CadTable, NeoDataset};
use crate::error::{NeoError, NeoResult};

/// Display format of the derived `cd_formatted` column.
pub const CD_DISPLAY_FORMAT: &str = "%m-%d-%y %H:%M";

/// Accepted close-approach timestamp layouts, tried in order.
/// The API itself emits the first one (`2025-Jan-01 12:34`).
const CD_FORMATS: &[&str] = &[
    "%Y-%b-%d %H:%M",
    "%Y-%b-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

// ---------------------------------------------------------------------------
// Column lookup
// ---------------------------------------------------------------------------

/// Resolved positions of the columns the deriver reads.
struct Columns {
    des: usize,
    cd: usize,
    dist: usize,
    dist_min: usize,
    orbit_id: Option<usize>,
    jd: Option<usize>,
    dist_max: Option<usize>,
    v_rel: Option<usize>,
    v_inf: Option<usize>,
    t_sigma_f: Option<usize>,
    h: Option<usize>,
}

impl Columns {
    fn locate(table: &CadTable) -> NeoResult<Self> {
        let required = |name: &'static str| table.column(name).ok_or(NeoError::MissingField(name));
        Ok(Columns {
            des: required("des")?,
            cd: required("cd")?,
            dist: required("dist")?,
            dist_min: required("dist_min")?,
            orbit_id: table.column("orbit_id"),
            jd: table.column("jd"),
            dist_max: table.column("dist_max"),
            v_rel: table.column("v_rel"),
            v_inf: table.column("v_inf"),
            t_sigma_f: table.column("t_sigma_f"),
            h: table.column("h"),
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn a raw table into records with numeric distances, the uncertainty
/// delta and parsed/formatted approach dates.
///
/// Fails on the first cell that cannot be coerced; nothing is dropped or
/// defaulted silently.
pub fn derive_dataset(
    table: CadTable,
    source: String,
    fetched_at: DateTime<Utc>,
) -> NeoResult<NeoDataset> {
    let cols = Columns::locate(&table)?;

    let records = table
        .rows
        .into_iter()
        .enumerate()
        .map(|(row, cells)| derive_record(&cols, row, cells))
        .collect::<NeoResult<Vec<_>>>()?;

    let anomalies = records.iter().filter(|r| r.dist_delta < 0.0).count();
    if anomalies > 0 {
        log::warn!("{anomalies} approaches have a minimum distance above the nominal distance");
    }

    Ok(NeoDataset {
        records,
        fields: table.fields,
        source,
        fetched_at,
    })
}

fn derive_record(cols: &Columns, row: usize, raw: Vec<Option<String>>) -> NeoResult<ApproachRecord> {
    let text = |idx: Option<usize>| idx.and_then(|i| raw[i].clone());
    let required = |idx: usize, field: &'static str| {
        raw[idx]
            .as_deref()
            .ok_or(NeoError::NullValue { row, field })
    };

    let des = required(cols.des, "des")?.to_string();
    let cd_text = required(cols.cd, "cd")?;
    let cd = parse_close_approach_date(cd_text).ok_or_else(|| NeoError::Timestamp {
        row,
        value: cd_text.to_string(),
    })?;

    let dist = parse_au(required(cols.dist, "dist")?, row, "dist")?;
    let dist_min = parse_au(required(cols.dist_min, "dist_min")?, row, "dist_min")?;

    let optional = |idx: Option<usize>, field: &'static str| -> NeoResult<Option<f64>> {
        match idx.and_then(|i| raw[i].as_deref()) {
            Some(value) => parse_au(value, row, field).map(Some),
            None => Ok(None),
        }
    };
    let dist_max = optional(cols.dist_max, "dist_max")?;
    let v_rel = optional(cols.v_rel, "v_rel")?;
    let v_inf = optional(cols.v_inf, "v_inf")?;
    let h = optional(cols.h, "h")?;

    Ok(ApproachRecord {
        orbit_id: text(cols.orbit_id),
        jd: text(cols.jd),
        t_sigma_f: text(cols.t_sigma_f),
        des,
        cd,
        dist,
        dist_min,
        dist_max,
        v_rel,
        v_inf,
        h,
        dist_delta: dist - dist_min,
        cd_formatted: cd.format(CD_DISPLAY_FORMAT).to_string(),
        raw,
    })
}

// ---------------------------------------------------------------------------
// Cell parsers
// ---------------------------------------------------------------------------

fn parse_au(value: &str, row: usize, field: &'static str) -> NeoResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| NeoError::Coercion {
            row,
            field,
            value: value.to_string(),
        })
}

/// Parse a close-approach timestamp. A bare `YYYY-MM-DD` means midnight.
pub fn parse_close_approach_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    CD_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%b-%d"))
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
