//! Organization credit balance.

use serde::{Deserialize, Serialize};

/// Credits available to the organization, in USD. Credits pay for API usage:
/// judge evaluations, router runs, and training jobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrganizationBalance {
    pub credits: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_balance() {
        let balance: OrganizationBalance =
            serde_json::from_value(serde_json::json!({ "credits": 41.25 })).unwrap();
        assert_eq!(balance.credits, 41.25);
    }
}
