use super::filter::Partition;
use super::model::NeoDataset;

/// Counts and plot extents shown alongside the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub kept: usize,
    pub excluded: usize,
    /// Records whose minimum distance exceeds the nominal one.
    pub negative_delta: usize,
    /// End point of the equal-distance line, starting at the origin:
    /// `(max dist, max dist_min)` over the full dataset.
    pub reference_end: Option<[f64; 2]>,
}

impl Summary {
    pub fn of(dataset: &NeoDataset, partition: &Partition) -> Self {
        let reference_end = dataset.records.first().map(|first| {
            dataset.records.iter().fold([first.dist, first.dist_min], |[x, y], r| {
                [x.max(r.dist), y.max(r.dist_min)]
            })
        });

        Summary {
            total: dataset.len(),
            kept: partition.kept.len(),
            excluded: partition.excluded.len(),
            negative_delta: dataset.records.iter().filter(|r| r.dist_delta < 0.0).count(),
            reference_end,
        }
    }

    pub fn caption(&self) -> String {
        format!("Graphing {} / {} items", self.kept, self.total)
    }

    pub fn excluded_caption(&self) -> String {
        format!("Items that were filtered out ({})", self.excluded)
    }
}
