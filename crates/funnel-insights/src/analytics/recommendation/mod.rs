//! Rule-based budget action classifier.
//!
//! Rules are checked in a fixed priority order, so unreliable data always
//! pauses a program before volume or performance are considered.

mod criteria;
mod rules;

#[cfg(test)]
mod tests;

pub use criteria::RecommendationCriteria;
pub use rules::RecommendationRule;

use serde::Serialize;
use tracing::debug;

use super::domain::{BudgetRecommendation, Program};
use rules::{Signals, RULES};

/// Stateless classifier holding the thresholds it applies.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    criteria: RecommendationCriteria,
}

impl RecommendationEngine {
    pub fn new(criteria: RecommendationCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &RecommendationCriteria {
        &self.criteria
    }

    pub fn evaluate(&self, program: &Program) -> RecommendationOutcome {
        let signals = Signals::from_program(program);
        let entry = RULES
            .iter()
            .find(|entry| (entry.applies)(&signals, &self.criteria))
            .unwrap_or(&RULES[RULES.len() - 1]);
        let outcome = RecommendationOutcome {
            rule: entry.rule,
            recommendation: (entry.outcome)(&signals, &self.criteria),
        };

        debug!(
            program = %program.id,
            rule = outcome.rule.label(),
            action = outcome.recommendation.action.label(),
            "recommendation evaluated"
        );
        outcome
    }
}

/// Recommendation together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutcome {
    pub rule: RecommendationRule,
    pub recommendation: BudgetRecommendation,
}

/// Classifies a program; `None` applies [`RecommendationCriteria::default`].
pub fn generate_recommendation(
    program: &Program,
    criteria: Option<&RecommendationCriteria>,
) -> BudgetRecommendation {
    let engine = criteria.map_or_else(RecommendationEngine::default, |criteria| {
        RecommendationEngine::new(criteria.clone())
    });
    engine.evaluate(program).recommendation
}
