//! Ordered risk policy chain.

use super::{RiskContext, RiskDecision, RiskPolicy};
use crate::domain::OrderIntent;

#[derive(Default)]
pub struct RiskChain {
    policies: Vec<Box<dyn RiskPolicy>>,
}

impl RiskChain {
    pub fn new(policies: Vec<Box<dyn RiskPolicy>>) -> Self {
        Self { policies }
    }

    pub fn with(mut self, policy: impl RiskPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Visit policies in order; the first rejection is returned and the
    /// remaining policies are skipped. An empty chain approves.
    pub fn evaluate(&self, intent: &OrderIntent, ctx: &RiskContext<'_>) -> RiskDecision {
        for policy in &self.policies {
            let decision = policy.check(intent, ctx);
            if !decision.is_approved() {
                return decision;
            }
        }
        RiskDecision::Approved
    }

    pub fn policy_names(&self) -> Vec<&str> {
        self.policies.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl std::fmt::Debug for RiskChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskChain")
            .field("policies", &self.policy_names())
            .finish()
    }
}
