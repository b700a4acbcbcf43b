//! Debounced search autocompletion.
//!
//! Rapid keystrokes are converted into at most one remote lookup per quiet
//! period. Results are ordered by request issuance: every call to
//! [`SuggestionDebouncer::on_input`] bumps a generation, and a lookup whose
//! generation is no longer current discards its result instead of
//! displaying it, even if its response arrives after a newer one's.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::gateway::DetectionGateway;
use crate::types::Suggestion;

/// Quiet period before a keystroke triggers a remote lookup.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Inputs shorter than this never trigger a lookup.
pub const MIN_INPUT_LEN: usize = 2;

/// Rate-limits suggestion lookups for the search box.
#[derive(Clone)]
pub struct SuggestionDebouncer {
    gateway: Arc<dyn DetectionGateway>,
    suggestions: Arc<Mutex<Vec<Suggestion>>>,
    generation: Arc<AtomicU64>,
    quiet_period: Duration,
}

impl SuggestionDebouncer {
    pub fn new(gateway: Arc<dyn DetectionGateway>) -> Self {
        Self {
            gateway,
            suggestions: Arc::new(Mutex::new(Vec::new())),
            generation: Arc::new(AtomicU64::new(0)),
            quiet_period: QUIET_PERIOD,
        }
    }

    /// Override the quiet period; test hook.
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Feed one input-box state change. Short inputs clear the suggestion
    /// list immediately without a request; anything else schedules a
    /// lookup after the quiet period, cancelling any pending one.
    ///
    /// Must be called within a tokio runtime.
    pub fn on_input(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < MIN_INPUT_LEN {
            self.suggestions.lock().clear();
            return;
        }

        let text = text.to_string();
        let gateway = Arc::clone(&self.gateway);
        let suggestions = Arc::clone(&self.suggestions);
        let latest = Arc::clone(&self.generation);
        let quiet_period = self.quiet_period;

        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if latest.load(Ordering::SeqCst) != generation {
                // Superseded during the quiet period, lookup never fires
                return;
            }

            let result = gateway.get_suggestions(&text).await;

            if latest.load(Ordering::SeqCst) != generation {
                debug!(input = %text, "discarding superseded suggestion response");
                return;
            }

            match result {
                Ok(list) => *suggestions.lock() = list,
                Err(e) => {
                    // Lookup failures degrade silently to no suggestions
                    debug!(input = %text, error = %e, "suggestion lookup failed");
                    suggestions.lock().clear();
                }
            }
        });
    }

    /// Immediate, undebounced lookup. Honors the minimum-length guard and
    /// supersedes any pending debounced lookup.
    pub async fn lookup(&self, text: &str) -> Result<Vec<Suggestion>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if text.chars().count() < MIN_INPUT_LEN {
            self.suggestions.lock().clear();
            return Ok(Vec::new());
        }

        let list = self.gateway.get_suggestions(text).await?;
        if self.generation.load(Ordering::SeqCst) == generation {
            *self.suggestions.lock() = list.clone();
        }
        Ok(list)
    }

    /// The currently visible suggestion list.
    pub fn current(&self) -> Vec<Suggestion> {
        self.suggestions.lock().clone()
    }

    /// Drop all suggestions and invalidate any pending lookup.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.suggestions.lock().clear();
    }
}
