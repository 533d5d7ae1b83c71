use serde::{Deserialize, Serialize};

/// 得分明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// 答对题数
    pub correct: u32,
    /// 答错题数
    pub wrong: u32,
    /// 未作答题数
    pub unanswered: u32,
    /// 总分
    #[serde(default)]
    pub total_points: f64,
    /// 百分制得分
    pub percentage: f64,
}

/// 识别结果
///
/// 识别服务返回的内容，核心逻辑只用来展示，不做解释。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    #[serde(default)]
    pub result_id: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_number: Option<String>,
    pub score: Score,
    #[serde(default)]
    pub processed_at: Option<String>,
}

impl RecognitionOutcome {
    /// 只有得分的结果
    pub fn from_score(score: Score) -> Self {
        Self {
            result_id: None,
            student_name: None,
            student_number: None,
            score,
            processed_at: None,
        }
    }

    /// 简短展示，例如 "85% (对 34 / 错 5 / 空 1)"
    pub fn summary_line(&self) -> String {
        format!(
            "{:.0}% (对 {} / 错 {} / 空 {})",
            self.score.percentage, self.score.correct, self.score.wrong, self.score.unanswered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_payload_ignores_extra_fields() {
        let payload = serde_json::json!({
            "result_id": "r-1",
            "exam_id": "e-1",
            "student_name": "budi",
            "answers": {"1": 2},
            "unanswered": [3],
            "score": {
                "correct": 34,
                "wrong": 5,
                "unanswered": 1,
                "total_points": 85.0,
                "percentage": 85.0
            },
            "image_path": "uploads/x.jpg",
            "processed_at": "2026-10-18T08:00:00"
        });

        let outcome: RecognitionOutcome = serde_json::from_value(payload).unwrap();

        assert_eq!(outcome.result_id.as_deref(), Some("r-1"));
        assert_eq!(outcome.score.correct, 34);
        assert_eq!(outcome.summary_line(), "85% (对 34 / 错 5 / 空 1)");
    }
}
