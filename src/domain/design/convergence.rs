//! Heuristic convergence detection over the belief store.

use crate::domain::beliefs::BeliefStore;

/// Signals the end of questioning once mean belief variance drops below a
/// threshold. Purely heuristic and independent of the posterior
/// reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceMonitor {
    threshold: f64,
}

impl ConvergenceMonitor {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// True when the arithmetic mean of variance across all known beliefs
    /// is strictly below the threshold. An empty store never converges.
    pub fn is_converged(&self, store: &BeliefStore) -> bool {
        match store.mean_variance() {
            Some(mean) => mean < self.threshold,
            None => false,
        }
    }

    /// Current mean variance, for progress reporting.
    pub fn current_uncertainty(&self, store: &BeliefStore) -> Option<f64> {
        store.mean_variance()
    }
}

impl Default for ConvergenceMonitor {
    fn default() -> Self {
        Self::new(1.0)
    }
}
