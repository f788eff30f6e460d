//! Usage accounting.
//!
//! Tracks what a client instance has spent: judge evaluations (with their
//! reported USD cost) and routed completions (with token counts). Purely
//! client-side bookkeeping; the authoritative balance is
//! `OrganizationClient::credit_balance`.

use martian_core::{ChatCompletion, JudgeEvaluation};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Accumulated usage for one client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageReport {
    /// Judge evaluations run.
    pub evaluations: u32,

    /// Routed completions run.
    pub completions: u32,

    /// Prompt tokens across completions.
    pub prompt_tokens: u64,

    /// Completion tokens across completions.
    pub completion_tokens: u64,

    /// Total USD cost of evaluations, where the server reported one.
    pub evaluation_cost: f64,
}

pub(crate) struct UsageTracker {
    report: RwLock<UsageReport>,
}

impl UsageTracker {
    pub(crate) fn new() -> Self {
        Self {
            report: RwLock::new(UsageReport::default()),
        }
    }

    pub(crate) fn record_evaluation(&self, evaluation: &JudgeEvaluation) {
        let mut report = self.report.write();
        report.evaluations += 1;
        if let Some(cost) = evaluation.cost {
            report.evaluation_cost += cost;
        }
    }

    pub(crate) fn record_completion(&self, completion: &ChatCompletion) {
        let mut report = self.report.write();
        report.completions += 1;
        if let Some(usage) = &completion.usage {
            report.prompt_tokens += u64::from(usage.prompt_tokens);
            report.completion_tokens += u64::from(usage.completion_tokens);
        }
    }

    pub(crate) fn report(&self) -> UsageReport {
        self.report.read().clone()
    }

    pub(crate) fn reset(&self) {
        *self.report.write() = UsageReport::default();
    }
}
