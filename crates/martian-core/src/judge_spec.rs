//! Judge specifications.
//!
//! A judge is a server-side evaluator of LLM response quality. A [`JudgeSpec`]
//! is the tagged configuration record the client sends when creating a judge
//! or evaluating an unsaved spec. The server interprets the spec; the client's
//! job is to serialize it faithfully and catch malformed configurations before
//! they leave the process.
//!
//! On the wire a spec is a flat JSON object discriminated by `model_type`,
//! with unset optional fields omitted:
//!
//! ```json
//! {
//!   "model_type": "rubric_judge",
//!   "rubric": "...",
//!   "model": "openai/openai/gpt-4o",
//!   "min_score": 1.0,
//!   "max_score": 5.0
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors from local judge-spec validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("field must not be empty: {0}")]
    EmptyField(&'static str),

    #[error("invalid score bounds: min_score {min} > max_score {max}")]
    InvalidBounds { min: f64, max: f64 },

    #[error("score value is not finite: {field} = {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{0} requires at least one child judge")]
    EmptyChildren(&'static str),

    #[error("weights length {weights} does not match judges length {judges}")]
    WeightMismatch { judges: usize, weights: usize },

    #[error("invalid weight: {0} (weights must be finite and non-negative, with a positive sum)")]
    InvalidWeight(f64),
}

/// A rubric-based judge: a judging model applies the rubric text and produces
/// a score in `[min_score, max_score]`.
///
/// The server wraps the rubric in a default prescript/postscript that instructs
/// the judging model to emit `<rationale>` and `<score>` tags. Overriding
/// `prescript`/`postscript` replaces those instructions, so any override must
/// keep the `${min_score}`, `${max_score}` and `${content}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RubricJudgeSpec {
    /// The evaluation criteria the judging model applies.
    pub rubric: String,

    /// Identifier of the judging model (e.g. "openai/openai/gpt-4o").
    pub model: String,

    /// Minimum assignable score.
    pub min_score: f64,

    /// Maximum assignable score.
    pub max_score: f64,

    /// Instructions placed before the rubric in the judging prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescript: Option<String>,

    /// Instructions placed after the rubric in the judging prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postscript: Option<String>,

    /// Server-side variable extraction configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_variables: Option<JsonValue>,

    /// Server-side judgement extraction configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_judgement: Option<JsonValue>,
}

impl RubricJudgeSpec {
    /// Create a rubric spec with the required fields.
    pub fn new(
        rubric: impl Into<String>,
        model: impl Into<String>,
        min_score: f64,
        max_score: f64,
    ) -> Self {
        Self {
            rubric: rubric.into(),
            model: model.into(),
            min_score,
            max_score,
            prescript: None,
            postscript: None,
            extract_variables: None,
            extract_judgement: None,
        }
    }

    /// Override the default prescript.
    pub fn with_prescript(mut self, prescript: impl Into<String>) -> Self {
        self.prescript = Some(prescript.into());
        self
    }

    /// Override the default postscript.
    pub fn with_postscript(mut self, postscript: impl Into<String>) -> Self {
        self.postscript = Some(postscript.into());
        self
    }

    fn validate(&self) -> Result<(), SpecError> {
        if self.rubric.trim().is_empty() {
            return Err(SpecError::EmptyField("rubric"));
        }
        if self.model.trim().is_empty() {
            return Err(SpecError::EmptyField("model"));
        }
        check_finite("min_score", self.min_score)?;
        check_finite("max_score", self.max_score)?;
        if self.min_score > self.max_score {
            return Err(SpecError::InvalidBounds {
                min: self.min_score,
                max: self.max_score,
            });
        }
        Ok(())
    }
}

/// An exact-match judge: scores 1.0 when the response matches any known
/// answer, 0.0 otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExactMatchJudgeSpec {
    /// Acceptable answers the response is compared against.
    pub known_answers: Vec<String>,

    /// Server-side response extraction configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_response: Option<JsonValue>,
}

impl ExactMatchJudgeSpec {
    /// Create an exact-match spec from the acceptable answers.
    pub fn new(known_answers: Vec<String>) -> Self {
        Self {
            known_answers,
            extract_response: None,
        }
    }

    fn validate(&self) -> Result<(), SpecError> {
        if self.known_answers.is_empty() {
            return Err(SpecError::EmptyField("known_answers"));
        }
        Ok(())
    }
}

/// A gold-match judge: compares the response against the gold response
/// supplied with each evaluation request, rather than answers fixed in the
/// spec.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoldMatchJudgeSpec {
    /// Score assigned when the response matches the gold response.
    #[serde(default = "default_match_score")]
    pub match_score: f64,

    /// Score assigned otherwise.
    #[serde(default)]
    pub mismatch_score: f64,

    /// Server-side response extraction configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_response: Option<JsonValue>,
}

fn default_match_score() -> f64 {
    1.0
}

impl Default for GoldMatchJudgeSpec {
    fn default() -> Self {
        Self {
            match_score: 1.0,
            mismatch_score: 0.0,
            extract_response: None,
        }
    }
}

impl GoldMatchJudgeSpec {
    fn validate(&self) -> Result<(), SpecError> {
        check_finite("match_score", self.match_score)?;
        check_finite("mismatch_score", self.mismatch_score)?;
        Ok(())
    }

    fn range(&self) -> (f64, f64) {
        (
            self.mismatch_score.min(self.match_score),
            self.mismatch_score.max(self.match_score),
        )
    }
}

/// A judge that always returns a fixed score. Useful as a `CaseJudge` branch
/// or as a baseline in aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstantJudgeSpec {
    /// The score returned for every evaluation.
    pub score: f64,
}

impl ConstantJudgeSpec {
    fn validate(&self) -> Result<(), SpecError> {
        check_finite("score", self.score)
    }
}

/// Child judges combined by a max/min/sum aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateJudgeSpec {
    /// The judges whose scores are combined.
    pub judges: Vec<JudgeSpec>,
}

impl AggregateJudgeSpec {
    /// Create an aggregate over the given child judges.
    pub fn new(judges: Vec<JudgeSpec>) -> Self {
        Self { judges }
    }

    fn validate(&self, kind: &'static str) -> Result<(), SpecError> {
        if self.judges.is_empty() {
            return Err(SpecError::EmptyChildren(kind));
        }
        for judge in &self.judges {
            judge.validate()?;
        }
        Ok(())
    }
}

/// Child judges combined by a (optionally weighted) mean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AverageScoreJudgeSpec {
    /// The judges whose scores are averaged.
    pub judges: Vec<JudgeSpec>,

    /// Per-judge weights. When omitted, the mean is unweighted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<f64>>,
}

impl AverageScoreJudgeSpec {
    /// Create an unweighted average over the given child judges.
    pub fn new(judges: Vec<JudgeSpec>) -> Self {
        Self {
            judges,
            weights: None,
        }
    }

    /// Attach per-judge weights.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    fn validate(&self) -> Result<(), SpecError> {
        if self.judges.is_empty() {
            return Err(SpecError::EmptyChildren("average_score_judge"));
        }
        for judge in &self.judges {
            judge.validate()?;
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.judges.len() {
                return Err(SpecError::WeightMismatch {
                    judges: self.judges.len(),
                    weights: weights.len(),
                });
            }
            let mut total = 0.0;
            for &w in weights {
                if !w.is_finite() || w < 0.0 {
                    return Err(SpecError::InvalidWeight(w));
                }
                total += w;
            }
            if total <= 0.0 {
                return Err(SpecError::InvalidWeight(total));
            }
        }
        Ok(())
    }

    fn normalized_weights(&self) -> Vec<f64> {
        match &self.weights {
            Some(weights) => {
                let total: f64 = weights.iter().sum();
                weights.iter().map(|w| w / total).collect()
            }
            None => {
                let n = self.judges.len() as f64;
                vec![1.0 / n; self.judges.len()]
            }
        }
    }
}

/// One branch of a [`CaseJudgeSpec`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgeCase {
    /// Condition judge. The case fires when its score reaches `threshold`.
    pub when: Box<JudgeSpec>,

    /// Minimum condition score for this case to fire.
    pub threshold: f64,

    /// Judge evaluated when the case fires.
    pub then: Box<JudgeSpec>,
}

/// A switch over condition judges: cases are tried in order and the first
/// whose condition score reaches its threshold selects the branch judge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseJudgeSpec {
    /// Ordered condition/branch pairs.
    pub cases: Vec<JudgeCase>,

    /// Branch evaluated when no case fires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Box<JudgeSpec>>,
}

impl CaseJudgeSpec {
    fn validate(&self) -> Result<(), SpecError> {
        if self.cases.is_empty() {
            return Err(SpecError::EmptyChildren("case_judge"));
        }
        for case in &self.cases {
            check_finite("threshold", case.threshold)?;
            case.when.validate()?;
            case.then.validate()?;
        }
        if let Some(default) = &self.default {
            default.validate()?;
        }
        Ok(())
    }
}

/// A judge specification, tagged on the wire by `model_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum JudgeSpec {
    RubricJudge(RubricJudgeSpec),
    ExactMatchJudge(ExactMatchJudgeSpec),
    GoldMatchJudge(GoldMatchJudgeSpec),
    ConstantJudge(ConstantJudgeSpec),
    MaxScoreJudge(AggregateJudgeSpec),
    MinScoreJudge(AggregateJudgeSpec),
    SumJudge(AggregateJudgeSpec),
    AverageScoreJudge(AverageScoreJudgeSpec),
    CaseJudge(CaseJudgeSpec),
}

impl JudgeSpec {
    /// Wrap a rubric spec.
    pub fn rubric(spec: RubricJudgeSpec) -> Self {
        Self::RubricJudge(spec)
    }

    /// Build an exact-match judge from the acceptable answers.
    pub fn exact_match(known_answers: Vec<String>) -> Self {
        Self::ExactMatchJudge(ExactMatchJudgeSpec::new(known_answers))
    }

    /// Build a gold-match judge with the default 1.0/0.0 scoring.
    pub fn gold_match() -> Self {
        Self::GoldMatchJudge(GoldMatchJudgeSpec::default())
    }

    /// Build a judge that always returns `score`.
    pub fn constant(score: f64) -> Self {
        Self::ConstantJudge(ConstantJudgeSpec { score })
    }

    /// Combine judges by taking the maximum score.
    pub fn max_of(judges: Vec<JudgeSpec>) -> Self {
        Self::MaxScoreJudge(AggregateJudgeSpec::new(judges))
    }

    /// Combine judges by taking the minimum score.
    pub fn min_of(judges: Vec<JudgeSpec>) -> Self {
        Self::MinScoreJudge(AggregateJudgeSpec::new(judges))
    }

    /// Combine judges by summing scores.
    pub fn sum_of(judges: Vec<JudgeSpec>) -> Self {
        Self::SumJudge(AggregateJudgeSpec::new(judges))
    }

    /// Combine judges by an unweighted mean.
    pub fn average_of(judges: Vec<JudgeSpec>) -> Self {
        Self::AverageScoreJudge(AverageScoreJudgeSpec::new(judges))
    }

    /// The wire discriminator for this spec.
    pub fn model_type(&self) -> &'static str {
        match self {
            Self::RubricJudge(_) => "rubric_judge",
            Self::ExactMatchJudge(_) => "exact_match_judge",
            Self::GoldMatchJudge(_) => "gold_match_judge",
            Self::ConstantJudge(_) => "constant_judge",
            Self::MaxScoreJudge(_) => "max_score_judge",
            Self::MinScoreJudge(_) => "min_score_judge",
            Self::SumJudge(_) => "sum_judge",
            Self::AverageScoreJudge(_) => "average_score_judge",
            Self::CaseJudge(_) => "case_judge",
        }
    }

    /// Check the spec's local invariants, recursing into child judges.
    pub fn validate(&self) -> Result<(), SpecError> {
        match self {
            Self::RubricJudge(s) => s.validate(),
            Self::ExactMatchJudge(s) => s.validate(),
            Self::GoldMatchJudge(s) => s.validate(),
            Self::ConstantJudge(s) => s.validate(),
            Self::MaxScoreJudge(s) => s.validate("max_score_judge"),
            Self::MinScoreJudge(s) => s.validate("min_score_judge"),
            Self::SumJudge(s) => s.validate("sum_judge"),
            Self::AverageScoreJudge(s) => s.validate(),
            Self::CaseJudge(s) => s.validate(),
        }
    }

    /// The inclusive score interval this spec can produce.
    ///
    /// Aggregate ranges derive from children: a sum judge's bounds are the
    /// sums of the child bounds, an average judge's the (weighted) means,
    /// and so on. Returns an error for specs that fail [`validate`].
    ///
    /// [`validate`]: Self::validate
    pub fn score_range(&self) -> Result<(f64, f64), SpecError> {
        self.validate()?;
        Ok(self.range_unchecked())
    }

    fn range_unchecked(&self) -> (f64, f64) {
        match self {
            Self::RubricJudge(s) => (s.min_score, s.max_score),
            Self::ExactMatchJudge(_) => (0.0, 1.0),
            Self::GoldMatchJudge(s) => s.range(),
            Self::ConstantJudge(s) => (s.score, s.score),
            Self::MaxScoreJudge(s) | Self::MinScoreJudge(s) => {
                // Both max-of and min-of select one child score, so the
                // reachable interval is the envelope of the child intervals.
                fold_ranges(&s.judges, |(lo_a, hi_a), (lo_b, hi_b)| {
                    (lo_a.min(lo_b), hi_a.max(hi_b))
                })
            }
            Self::SumJudge(s) => fold_ranges(&s.judges, |(lo_a, hi_a), (lo_b, hi_b)| {
                (lo_a + lo_b, hi_a + hi_b)
            }),
            Self::AverageScoreJudge(s) => {
                let weights = s.normalized_weights();
                let mut lo = 0.0;
                let mut hi = 0.0;
                for (judge, w) in s.judges.iter().zip(weights) {
                    let (j_lo, j_hi) = judge.range_unchecked();
                    lo += w * j_lo;
                    hi += w * j_hi;
                }
                (lo, hi)
            }
            Self::CaseJudge(s) => {
                let branches = s
                    .cases
                    .iter()
                    .map(|c| c.then.as_ref())
                    .chain(s.default.iter().map(|d| d.as_ref()));
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for branch in branches {
                    let (b_lo, b_hi) = branch.range_unchecked();
                    lo = lo.min(b_lo);
                    hi = hi.max(b_hi);
                }
                (lo, hi)
            }
        }
    }
}

fn fold_ranges(judges: &[JudgeSpec], combine: fn((f64, f64), (f64, f64)) -> (f64, f64)) -> (f64, f64) {
    let mut iter = judges.iter().map(JudgeSpec::range_unchecked);
    let first = iter.next().expect("validated aggregates are non-empty");
    iter.fold(first, combine)
}

fn check_finite(field: &'static str, value: f64) -> Result<(), SpecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpecError::NonFinite { field, value })
    }
}
