//! Predictive search suggestions.
//!
//! DESIGN
//! ======
//! Every input bumps a generation counter. After the debounce delay the
//! call checks that it is still the newest input before fetching, and
//! again before storing results. A superseded call resolves as
//! [`SearchOutcome::Stale`] and never touches the displayed suggestions.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::{Outcome, WidgetContext, WidgetError};
use crate::api::SuggestedProduct;
use crate::config::SearchSettings;
use crate::validation::validate_search_term;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    /// The search box text changed.
    Input(String),
    /// The search form was submitted.
    Submit(String),
    /// Close the suggestions panel.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query too short; suggestions hidden.
    Hidden,
    Results(Vec<SuggestedProduct>),
    /// A newer input superseded this one.
    Stale,
    /// Navigate to the results page for this trimmed term.
    Submitted(String),
}

#[derive(Debug, Default)]
struct SearchState {
    generation: u64,
    visible: bool,
    query: String,
    results: Vec<SuggestedProduct>,
}

#[derive(Debug, Clone)]
pub struct SearchWidget {
    ctx: WidgetContext,
    settings: SearchSettings,
    state: Arc<Mutex<SearchState>>,
}

impl SearchWidget {
    #[must_use]
    pub fn new(ctx: WidgetContext, settings: SearchSettings) -> Self {
        Self { ctx, settings, state: Arc::new(Mutex::new(SearchState::default())) }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    /// Suggestions currently displayed.
    #[must_use]
    pub fn results(&self) -> Vec<SuggestedProduct> {
        self.lock().results.clone()
    }

    /// Query the displayed suggestions belong to.
    #[must_use]
    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    /// # Errors
    ///
    /// `Input` fails when the newest suggestion fetch fails; `Submit` fails
    /// on a blank term.
    pub async fn handle(&self, action: SearchAction) -> Result<Outcome, WidgetError> {
        let outcome = match action {
            SearchAction::Input(text) => self.input(&text).await?,
            SearchAction::Submit(text) => SearchOutcome::Submitted(validate_search_term(&text)?.to_owned()),
            SearchAction::Clear => {
                self.hide(self.bump());
                SearchOutcome::Hidden
            }
        };
        Ok(Outcome::Search(outcome))
    }

    /// Debounced suggestion fetch for `text`.
    ///
    /// # Errors
    ///
    /// Returns the API error if this is still the newest input when the
    /// fetch fails. Errors of superseded inputs resolve as `Stale`.
    pub async fn input(&self, text: &str) -> Result<SearchOutcome, WidgetError> {
        let query = text.trim().to_owned();
        let generation = self.bump();

        if query.chars().count() < self.settings.min_chars {
            self.hide(generation);
            return Ok(SearchOutcome::Hidden);
        }

        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
        }
        if !self.is_current(generation) {
            debug!(query, generation, "search input superseded during debounce");
            return Ok(SearchOutcome::Stale);
        }

        let fetched = self.ctx.api.suggest(&query, self.settings.limit).await;

        let mut state = self.lock();
        if state.generation != generation {
            debug!(query, generation, "discarding superseded search results");
            return Ok(SearchOutcome::Stale);
        }
        let results = fetched?;
        state.visible = true;
        state.query = query;
        state.results = results.clone();
        Ok(SearchOutcome::Results(results))
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn bump(&self) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn hide(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation == generation {
            state.visible = false;
            state.query.clear();
            state.results.clear();
        }
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
