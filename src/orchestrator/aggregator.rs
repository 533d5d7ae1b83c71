//! 结果汇总
//!
//! 只读批次快照，计算成功 / 失败数量和完成状态。

use crate::models::batch::Batch;
use crate::models::submission::ItemState;

/// 批次统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub pending: usize,
    pub processing: usize,
    pub is_complete: bool,
    /// 成功条目的平均得分（百分制）
    pub average_percentage: Option<f64>,
}

impl BatchSummary {
    pub fn from_batch(batch: &Batch) -> Self {
        let mut summary = BatchSummary {
            total: batch.len(),
            ..Default::default()
        };
        let mut percentage_sum = 0.0;

        for item in batch.items() {
            match item.state() {
                ItemState::Pending => summary.pending += 1,
                ItemState::Processing => summary.processing += 1,
                ItemState::Succeeded(outcome) => {
                    summary.succeeded += 1;
                    percentage_sum += outcome.score.percentage;
                }
                ItemState::Failed { .. } => summary.failed += 1,
            }
        }

        summary.is_complete = summary.succeeded + summary.failed == summary.total;
        if summary.succeeded > 0 {
            summary.average_percentage = Some(percentage_sum / summary.succeeded as f64);
        }
        summary
    }

    pub fn terminal(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{CaptureOrigin, DocumentHandle, MediaType};
    use crate::models::outcome::{RecognitionOutcome, Score};
    use crate::models::submission::SubmissionItem;

    fn item() -> SubmissionItem {
        SubmissionItem::new(DocumentHandle::new(
            "x.jpg",
            vec![1],
            CaptureOrigin::Camera,
            MediaType::Jpeg,
        ))
    }

    fn outcome(percentage: f64) -> RecognitionOutcome {
        RecognitionOutcome::from_score(Score {
            correct: 1,
            wrong: 0,
            unanswered: 0,
            total_points: percentage,
            percentage,
        })
    }

    #[test]
    fn test_empty_batch_is_vacuously_complete() {
        let summary = BatchSummary::from_batch(&Batch::new("exam"));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.terminal(), 0);
        assert!(summary.is_complete);
        assert_eq!(summary.average_percentage, None);
    }

    #[test]
    fn test_mixed_batch() {
        let mut batch = Batch::new("exam");
        let mut ok_a = item();
        ok_a.begin_processing().unwrap();
        ok_a.succeed(outcome(80.0)).unwrap();
        let mut ok_b = item();
        ok_b.begin_processing().unwrap();
        ok_b.succeed(outcome(60.0)).unwrap();
        let mut bad = item();
        bad.begin_processing().unwrap();
        bad.fail("blur").unwrap();
        let mut busy = item();
        busy.begin_processing().unwrap();
        batch.items = vec![ok_a, bad, ok_b, busy, item()];

        let summary = BatchSummary::from_batch(&batch);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.processing, 1);
        assert_eq!(summary.pending, 1);
        assert!(!summary.is_complete);
        assert_eq!(summary.average_percentage, Some(70.0));
        assert_eq!(summary.succeeded, batch.succeeded_count());
        assert_eq!(summary.failed, batch.failed_count());
        assert_eq!(summary.is_complete, batch.is_complete());
    }
}
