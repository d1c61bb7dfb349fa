//! Token usage accounting per model.

use std::collections::BTreeMap;

use crate::TokenUsage;

/// Cumulative token usage for one session, broken down by model.
#[derive(Debug, Default)]
pub struct UsageTracker {
    total: TokenUsage,
    by_model: BTreeMap<String, TokenUsage>,
    call_count: u64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record usage from one provider call.
    pub fn record(&mut self, model: &str, usage: &TokenUsage) {
        add(&mut self.total, usage);
        add(self.by_model.entry(model.to_string()).or_default(), usage);
        self.call_count += 1;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_model(&self, model: &str) -> Option<&TokenUsage> {
        self.by_model.get(model)
    }

    /// Models in name order with their usage.
    pub fn models(&self) -> impl Iterator<Item = (&str, &TokenUsage)> {
        self.by_model.iter().map(|(m, u)| (m.as_str(), u))
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}

fn add(into: &mut TokenUsage, usage: &TokenUsage) {
    into.input_tokens = into.input_tokens.saturating_add(usage.input_tokens);
    into.output_tokens = into.output_tokens.saturating_add(usage.output_tokens);
}
