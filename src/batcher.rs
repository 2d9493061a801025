//! Partitioning of the target list into report-sized batches.

/// An ordered slice of the target list destined for one report.
///
/// Batches partition the input exactly: every target belongs to one batch,
/// batch order matches input order, and only the final batch may be short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based position of this batch; report filenames are keyed on it.
    pub ordinal: usize,
    pub targets: Vec<String>,
}

/// Lazily yield contiguous batches of at most `size` targets.
///
/// `size` must be non-zero; config validation enforces that before any batch
/// is built.
pub fn batches(targets: &[String], size: usize) -> impl Iterator<Item = Batch> + '_ {
    targets.chunks(size).enumerate().map(|(i, chunk)| Batch {
        ordinal: i + 1,
        targets: chunk.to_vec(),
    })
}
