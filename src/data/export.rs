use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::NeoDataset;

/// Derived columns appended after the API's own fields.
pub const DERIVED_COLUMNS: [&str; 2] = ["dist_delta", "cd_formatted"];

/// Header row for record tables and CSV export.
pub fn table_header(dataset: &NeoDataset) -> Vec<String> {
    dataset
        .fields
        .iter()
        .cloned()
        .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// One display/export row: raw cells (null → empty) plus the derived columns.
/// `dist_delta` keeps full precision; uncertainties are often below 1e-5 AU.
pub fn table_row(dataset: &NeoDataset, index: usize) -> Vec<String> {
    let record = &dataset.records[index];
    record
        .raw
        .iter()
        .map(|cell| cell.clone().unwrap_or_default())
        .chain([record.dist_delta.to_string(), record.cd_formatted.clone()])
        .collect()
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write the selected rows as CSV.
pub fn write_csv<W: Write>(writer: W, dataset: &NeoDataset, indices: &[usize]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table_header(dataset))
        .context("writing CSV header")?;
    for &idx in indices {
        out.write_record(table_row(dataset, idx))
            .with_context(|| format!("writing CSV row {idx}"))?;
    }
    out.flush().context("flushing CSV")?;
    Ok(())
}

pub fn export_csv(path: &Path, dataset: &NeoDataset, indices: &[usize]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, dataset, indices)?;
    log::info!("Exported {} rows to {}", indices.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive_dataset;
    use crate::data::model::CadTable;
    use chrono::Utc;

    fn dataset() -> NeoDataset {
        let table = CadTable {
            fields: vec!["des".into(), "cd".into(), "dist".into(), "dist_min".into(), "h".into()],
            rows: vec![
                vec![
                    Some("2025 AB".into()),
                    Some("2025-Jan-01 06:30".into()),
                    Some("0.02".into()),
                    Some("0.015".into()),
                    None,
                ],
                vec![
                    Some("2025 BC".into()),
                    Some("2025-Feb-02 00:00".into()),
                    Some("0.03".into()),
                    Some("0.03".into()),
                    Some("25.1".into()),
                ],
            ],
        };
        derive_dataset(table, "test".into(), Utc::now()).unwrap()
    }

    #[test]
    fn writes_selected_rows_with_derived_columns() {
        let ds = dataset();
        let mut buf = Vec::new();
        write_csv(&mut buf, &ds, &[1]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "des,cd,dist,dist_min,h,dist_delta,cd_formatted");
        assert_eq!(lines[1], "2025 BC,2025-Feb-02 00:00,0.03,0.03,25.1,0,02-02-25 00:00");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn null_cells_are_empty() {
        let ds = dataset();
        let row = table_row(&ds, 0);
        assert_eq!(row[4], "");
        let delta: f64 = row[5].parse().unwrap();
        assert_eq!(delta, ds.records[0].dist_delta);
    }

    #[test]
    fn tiny_uncertainty_survives_export() {
        let table = CadTable {
            fields: vec!["des".into(), "cd".into(), "dist".into(), "dist_min".into()],
            rows: vec![vec![
                Some("2024 XY".into()),
                Some("2025-Jan-01 00:00".into()),
                Some("0.0312345678".into()),
                Some("0.0312340001".into()),
            ]],
        };
        let ds = derive_dataset(table, "test".into(), Utc::now()).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &ds, &[0]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains(",0.00000,"));
        let row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        let delta: f64 = row[4].parse().unwrap();
        assert_eq!(delta, ds.records[0].dist_delta);
        approx::assert_relative_eq!(delta, 5.677e-7, max_relative = 1e-6);
    }

    #[test]
    fn exports_to_file() {
        let ds = dataset();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kept.csv");
        export_csv(&path, &ds, &[0, 1]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 2);
    }
}
