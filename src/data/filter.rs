use chrono::NaiveDate;

use super::model::{ApproachRecord, NeoDataset};

// ---------------------------------------------------------------------------
// Distance slider domain
// ---------------------------------------------------------------------------

/// Upper end of the distance slider (AU).
pub const AU_SLIDER_MAX: f64 = 0.060;
/// Slider resolution (AU).
pub const AU_SLIDER_STEP: f64 = 0.001;
/// Default selected distance range (AU).
pub const DEFAULT_AU_RANGE: (f64, f64) = (0.00, 0.05);

/// The discrete values the distance slider can take: `0.000, 0.001, … 0.060`.
pub fn au_slider_options() -> Vec<f64> {
    let steps = (AU_SLIDER_MAX / AU_SLIDER_STEP).round() as usize;
    (0..=steps).map(|x| x as f64 / 1000.0).collect()
}

/// Index of the slider option nearest to `value`, clamped into the domain.
pub fn au_slider_index(value: f64) -> usize {
    let last = (AU_SLIDER_MAX / AU_SLIDER_STEP).round();
    (value / AU_SLIDER_STEP).round().clamp(0.0, last) as usize
}

// ---------------------------------------------------------------------------
// Filter predicate: four inclusive range conditions
// ---------------------------------------------------------------------------

/// Date and minimum-distance bounds. All four are inclusive and combined
/// with AND. An inverted range is not swapped; it simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub min_au: f64,
    pub max_au: f64,
}

impl FilterBounds {
    pub fn new(start: NaiveDate, end: NaiveDate, min_au: f64, max_au: f64) -> Self {
        FilterBounds {
            start,
            end,
            min_au,
            max_au,
        }
    }

    /// Widget defaults for a fresh dataset: the observed date span and the
    /// default distance window. `None` when the dataset is empty.
    pub fn initial(dataset: &NeoDataset) -> Option<Self> {
        let (start, end) = dataset.date_range()?;
        Some(FilterBounds::new(
            start,
            end,
            DEFAULT_AU_RANGE.0,
            DEFAULT_AU_RANGE.1,
        ))
    }

    /// Bounds spanning every observed date and minimum distance.
    pub fn covering(dataset: &NeoDataset) -> Option<Self> {
        let (start, end) = dataset.date_range()?;
        let (min_au, max_au) = dataset.dist_min_range()?;
        Some(FilterBounds::new(start, end, min_au, max_au))
    }

    pub fn matches(&self, record: &ApproachRecord) -> bool {
        let date = record.date();
        date >= self.start
            && date <= self.end
            && record.dist_min >= self.min_au
            && record.dist_min <= self.max_au
    }
}

// ---------------------------------------------------------------------------
// Partition: kept / excluded
// ---------------------------------------------------------------------------

/// Indices into [`NeoDataset::records`], split by a [`FilterBounds`].
/// Every index lands in exactly one list, each list in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub kept: Vec<usize>,
    pub excluded: Vec<usize>,
}

impl Partition {
    /// Everything kept (used before any filter has been applied).
    pub fn all(dataset: &NeoDataset) -> Self {
        Partition {
            kept: (0..dataset.len()).collect(),
            excluded: Vec::new(),
        }
    }
}

/// Split the dataset in a single pass.
pub fn partition(dataset: &NeoDataset, bounds: &FilterBounds) -> Partition {
    let mut out = Partition::default();
    for (i, record) in dataset.records.iter().enumerate() {
        if bounds.matches(record) {
            out.kept.push(i);
        } else {
            out.excluded.push(i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_dataset;
    use crate::data::model::CadTable;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset(rows: &[(&str, &str, &str, &str)]) -> NeoDataset {
        let table = CadTable {
            fields: ["des", "cd", "dist", "dist_min"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|(a, b, c, d)| {
                    vec![
                        Some(a.to_string()),
                        Some(b.to_string()),
                        Some(c.to_string()),
                        Some(d.to_string()),
                    ]
                })
                .collect(),
        };
        derive_dataset(table, "test".into(), Utc::now()).unwrap()
    }

    fn sample() -> NeoDataset {
        dataset(&[
            ("2025 AB", "2025-Jan-01 03:10", "0.0200", "0.0150"),
            ("2025 BC", "2025-Feb-11 18:00", "0.0480", "0.0479"),
            ("2025 CD", "2025-Mar-20 00:00", "0.0031", "0.0000"),
            ("2026 DE", "2026-Jul-04 12:00", "0.0700", "0.0650"),
            ("2026 EF", "2026-Dec-31 23:59", "0.0110", "0.0120"),
        ])
    }

    fn assert_exact_split(ds: &NeoDataset, p: &Partition) {
        let kept: BTreeSet<_> = p.kept.iter().copied().collect();
        let excluded: BTreeSet<_> = p.excluded.iter().copied().collect();
        assert!(kept.is_disjoint(&excluded));
        let all: BTreeSet<_> = kept.union(&excluded).copied().collect();
        assert_eq!(all, (0..ds.len()).collect());
        assert!(p.kept.windows(2).all(|w| w[0] < w[1]));
        assert!(p.excluded.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn single_record_kept() {
        let ds = dataset(&[("2025 AB", "2025-01-01", "0.02", "0.015")]);
        let b = FilterBounds::new(date(2025, 1, 1), date(2025, 1, 1), 0.00, 0.05);
        let p = partition(&ds, &b);
        assert_eq!(p.kept, vec![0]);
        assert!(p.excluded.is_empty());
    }

    #[test]
    fn single_record_excluded_by_distance() {
        let ds = dataset(&[("2025 AB", "2025-01-01", "0.02", "0.015")]);
        let b = FilterBounds::new(date(2025, 1, 1), date(2025, 1, 1), 0.00, 0.01);
        let p = partition(&ds, &b);
        assert!(p.kept.is_empty());
        assert_eq!(p.excluded, vec![0]);
    }

    #[test]
    fn partition_is_exact_for_many_bounds() {
        let ds = sample();
        let dates = [date(2024, 12, 31), date(2025, 1, 1), date(2025, 3, 20), date(2027, 1, 1)];
        for &start in &dates {
            for &end in &dates {
                for &lo in &[0.0, 0.012, 0.03] {
                    for &hi in &[0.0, 0.015, 0.05, 0.06] {
                        let p = partition(&ds, &FilterBounds::new(start, end, lo, hi));
                        assert_exact_split(&ds, &p);
                        assert_eq!(p.kept.len() + p.excluded.len(), ds.len());
                    }
                }
            }
        }
    }

    #[test]
    fn covering_bounds_keep_everything() {
        let ds = sample();
        let b = FilterBounds::covering(&ds).unwrap();
        let p = partition(&ds, &b);
        assert_eq!(p, Partition::all(&ds));
    }

    #[test]
    fn zero_upper_bound_keeps_only_zero_distance() {
        let ds = sample();
        let b = FilterBounds::new(date(2000, 1, 1), date(2100, 1, 1), 0.0, 0.0);
        let p = partition(&ds, &b);
        assert_eq!(p.kept, vec![2]);
        assert!(p.kept.iter().all(|&i| ds.records[i].dist_min == 0.0));
    }

    #[test]
    fn inverted_dates_match_nothing() {
        let ds = sample();
        let b = FilterBounds::new(date(2026, 12, 31), date(2025, 1, 1), 0.0, 0.06);
        let p = partition(&ds, &b);
        assert!(p.kept.is_empty());
        assert_eq!(p.excluded.len(), ds.len());
    }

    #[test]
    fn inverted_distance_matches_nothing() {
        let ds = sample();
        let b = FilterBounds::new(date(2025, 1, 1), date(2026, 12, 31), 0.05, 0.01);
        assert!(partition(&ds, &b).kept.is_empty());
    }

    #[test]
    fn bounds_are_inclusive() {
        let ds = sample();
        // exactly the first record's date and dist_min
        let b = FilterBounds::new(date(2025, 1, 1), date(2025, 1, 1), 0.0150, 0.0150);
        assert_eq!(partition(&ds, &b).kept, vec![0]);
    }

    #[test]
    fn initial_bounds_use_observed_dates_and_default_window() {
        let ds = sample();
        let b = FilterBounds::initial(&ds).unwrap();
        assert_eq!(b.start, date(2025, 1, 1));
        assert_eq!(b.end, date(2026, 12, 31));
        assert_eq!((b.min_au, b.max_au), DEFAULT_AU_RANGE);
        // 2026 DE sits beyond 0.05 AU
        assert_eq!(partition(&ds, &b).excluded, vec![3]);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let ds = dataset(&[]);
        assert!(FilterBounds::initial(&ds).is_none());
        assert!(FilterBounds::covering(&ds).is_none());
    }

    #[test]
    fn slider_domain() {
        let opts = au_slider_options();
        assert_eq!(opts.len(), 61);
        assert_eq!(opts[0], 0.0);
        assert_eq!(opts[60], 0.06);
        assert_eq!(opts[au_slider_index(0.0234)], 0.023);
        assert_eq!(au_slider_index(0.05), 50);
        assert_eq!(au_slider_index(0.5), 60);
        assert_eq!(au_slider_index(-1.0), 0);
    }
}
