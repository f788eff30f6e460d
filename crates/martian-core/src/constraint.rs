//! Routing constraints.
//!
//! A trained router exposes a cost/quality trade-off frontier. A
//! [`RoutingConstraint`] picks the operating point for one request: either cap
//! the cost or floor the quality, each expressed directly as a number or by
//! reference to a known model's cost/quality.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors from local constraint validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    #[error("routing constraint must set a cost constraint, a quality constraint, or both")]
    NoConstraint,

    #[error("constraint value is not finite: {0}")]
    NonFinite(f64),

    #[error("cost constraint must be non-negative, got {0}")]
    NegativeCost(f64),

    #[error("quality constraint must be within [0, 1], got {0}")]
    QualityOutOfRange(f64),

    #[error("model name must not be empty")]
    EmptyModelName,
}

/// A constraint value: either an explicit number or a reference to a model
/// whose cost/quality the constraint mirrors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ConstraintValue {
    /// An explicit value. Maximum cost in USD for cost constraints; minimum
    /// quality in `[0, 1]` for quality constraints.
    #[serde(rename = "numeric_value")]
    Numeric(f64),

    /// Mirror the cost or quality of the named model.
    #[serde(rename = "model_name")]
    Model(String),
}

impl ConstraintValue {
    /// An explicit numeric value.
    pub fn numeric(value: f64) -> Self {
        Self::Numeric(value)
    }

    /// A value mirroring the named model.
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(name.into())
    }

    fn validate_model_name(&self) -> Result<(), ConstraintError> {
        if let Self::Model(name) = self {
            if name.trim().is_empty() {
                return Err(ConstraintError::EmptyModelName);
            }
        }
        Ok(())
    }
}

/// Maximum cost per request, in USD.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CostConstraint {
    pub value: ConstraintValue,
}

impl CostConstraint {
    fn validate(&self) -> Result<(), ConstraintError> {
        self.value.validate_model_name()?;
        if let ConstraintValue::Numeric(cost) = self.value {
            if !cost.is_finite() {
                return Err(ConstraintError::NonFinite(cost));
            }
            if cost < 0.0 {
                return Err(ConstraintError::NegativeCost(cost));
            }
        }
        Ok(())
    }
}

/// Minimum quality score, from 0 to 1.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct QualityConstraint {
    pub value: ConstraintValue,
}

impl QualityConstraint {
    fn validate(&self) -> Result<(), ConstraintError> {
        self.value.validate_model_name()?;
        if let ConstraintValue::Numeric(quality) = self.value {
            if !quality.is_finite() {
                return Err(ConstraintError::NonFinite(quality));
            }
            if !(0.0..=1.0).contains(&quality) {
                return Err(ConstraintError::QualityOutOfRange(quality));
            }
        }
        Ok(())
    }
}

/// The constraint applied to one routed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutingConstraint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_constraint: Option<CostConstraint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_constraint: Option<QualityConstraint>,
}

impl RoutingConstraint {
    /// Constrain by maximum cost.
    pub fn cost(value: ConstraintValue) -> Self {
        Self {
            cost_constraint: Some(CostConstraint { value }),
            quality_constraint: None,
        }
    }

    /// Constrain by minimum quality.
    pub fn quality(value: ConstraintValue) -> Self {
        Self {
            cost_constraint: None,
            quality_constraint: Some(QualityConstraint { value }),
        }
    }

    /// Add a quality floor to a cost-constrained request.
    pub fn with_quality(mut self, value: ConstraintValue) -> Self {
        self.quality_constraint = Some(QualityConstraint { value });
        self
    }

    /// Check that at least one constraint is set and that numeric values are
    /// in range.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if self.cost_constraint.is_none() && self.quality_constraint.is_none() {
            return Err(ConstraintError::NoConstraint);
        }
        if let Some(cost) = &self.cost_constraint {
            cost.validate()?;
        }
        if let Some(quality) = &self.quality_constraint {
            quality.validate()?;
        }
        Ok(())
    }

    /// The `{"routing_constraint": ...}` object merged into the body of a
    /// routed completion request.
    pub fn render_extra_body(&self) -> JsonValue {
        serde_json::json!({ "routing_constraint": self })
    }
}
