//! Judge evaluation results.

use serde::{Deserialize, Serialize};

/// The result of evaluating a completion with a judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeEvaluation {
    /// The assigned score. Range and interpretation depend on the judge's
    /// spec: a binary judge scores 0/1, a rubric judge scores within its
    /// configured bounds.
    pub score: f64,

    /// The judge's explanation for the score.
    #[serde(default)]
    pub reason: String,

    /// Cost in USD of the LLM calls the judge made, when the server could
    /// compute it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl JudgeEvaluation {
    /// Whether the score reaches `threshold`.
    pub fn passes(&self, threshold: f64) -> bool {
        self.score >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_threshold() {
        let evaluation = JudgeEvaluation {
            score: 4.0,
            reason: "clear and correct".to_string(),
            cost: Some(0.0003),
        };
        assert!(evaluation.passes(4.0));
        assert!(!evaluation.passes(4.5));
    }

    #[test]
    fn test_deserialize_without_cost() {
        let evaluation: JudgeEvaluation =
            serde_json::from_value(serde_json::json!({ "score": 1.0, "reason": "exact match" }))
                .unwrap();
        assert_eq!(evaluation.cost, None);
    }
}
