//! Attempt tracking for a provider scan.

use crate::models::ProviderId;

/// Why a provider in the source list was not asked.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The name in the source list has no registered adapter.
    UnknownProvider,

    /// The provider does not answer price lookups.
    PricesNotSupported,

    /// The provider does not answer dividend lookups.
    DividendsNotSupported,

    /// The provider does not handle the requested category.
    CategoryNotSupported { category: String },
}

/// Outcome of asking one provider.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    Skipped(SkipReason),
    Failed(String),
    NoData,
    Success,
}

/// Record of a single provider attempt during a scan.
#[derive(Clone, Debug)]
pub struct ProviderAttempt {
    pub provider_id: ProviderId,
    pub outcome: AttemptOutcome,
}

/// Ordered record of what happened to each name in the source list.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self {
            attempts: Vec::new(),
        }
    }

    fn record(&mut self, provider_id: ProviderId, outcome: AttemptOutcome) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            outcome,
        });
    }

    pub fn record_skip(&mut self, provider_id: ProviderId, reason: SkipReason) {
        self.record(provider_id, AttemptOutcome::Skipped(reason));
    }

    pub fn record_error(&mut self, provider_id: ProviderId, error: String) {
        self.record(provider_id, AttemptOutcome::Failed(error));
    }

    pub fn record_no_data(&mut self, provider_id: ProviderId) {
        self.record(provider_id, AttemptOutcome::NoData);
    }

    pub fn record_success(&mut self, provider_id: ProviderId) {
        self.record(provider_id, AttemptOutcome::Success);
    }

    /// Summary for logging.
    pub fn summary(&self) -> String {
        if self.attempts.is_empty() {
            return "no providers".to_string();
        }
        self.attempts
            .iter()
            .map(|a| match &a.outcome {
                AttemptOutcome::Success => format!("{}: SUCCESS", a.provider_id),
                AttemptOutcome::NoData => format!("{}: NO DATA", a.provider_id),
                AttemptOutcome::Skipped(skip) => format!("{}: SKIPPED ({:?})", a.provider_id, skip),
                AttemptOutcome::Failed(err) => format!("{}: ERROR ({})", a.provider_id, err),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    pub fn has_success(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| a.outcome == AttemptOutcome::Success)
    }

    /// Providers that were actually called, in call order.
    pub fn called(&self) -> Vec<&ProviderId> {
        self.attempts
            .iter()
            .filter(|a| !matches!(a.outcome, AttemptOutcome::Skipped(_)))
            .map(|a| &a.provider_id)
            .collect()
    }

    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failed(e) => Some((&a.provider_id, e.as_str())),
                _ => None,
            })
            .collect()
    }
}
