use crate::record::ConfigValue;
use serde::{Deserialize, Serialize};
use std::ops::Range;

const DEFAULT_BATCH_SIZE: u32 = 100;

/// How many learners the grade report job processes per batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeReportsBatchSize {
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

const fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

impl GradeReportsBatchSize {
    #[must_use]
    pub const fn new(batch_size: u32) -> Self {
        Self { batch_size }
    }

    /// Splits `total` learners into consecutive batches. A size of zero is treated as one.
    pub fn batches(self, total: usize) -> impl Iterator<Item = Range<usize>> {
        let size = usize::try_from(self.batch_size).unwrap_or(usize::MAX).max(1);
        (0..total).step_by(size).map(move |start| start..total.min(start.saturating_add(size)))
    }
}

impl Default for GradeReportsBatchSize {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl ConfigValue for GradeReportsBatchSize {
    const NAME: &'static str = "grade_reports_batch_size";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_hundred() {
        assert_eq!(GradeReportsBatchSize::default().batch_size, 100);
        let parsed: GradeReportsBatchSize = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.batch_size, 100);
    }

    #[test]
    fn batches_cover_every_learner_once() {
        let ranges: Vec<_> = GradeReportsBatchSize::new(100).batches(250).collect();
        assert_eq!(ranges, vec![0..100, 100..200, 200..250]);

        assert_eq!(GradeReportsBatchSize::new(100).batches(0).count(), 0);
        assert_eq!(GradeReportsBatchSize::new(0).batches(3).count(), 3);
    }
}
