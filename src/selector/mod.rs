pub mod commit;
pub mod machine;
pub mod search;

pub use commit::{CommitError, ErrorId};
pub use machine::{
    CommitCallback, InputRegion, ResultsRegion, SelectorContext, SelectorEffect, SelectorEvent,
    SelectorState, Transition, transition,
};
pub use search::BestMatch;

use tracing::{debug, info, trace};

/// Owns the live machine and runs the side of a transition that is not
/// pure: invoking the commit callback.
#[derive(Debug)]
pub struct DatasetSelector {
    state: SelectorState,
    context: SelectorContext,
}

impl DatasetSelector {
    pub fn new(
        value: impl Into<String>,
        values: Vec<String>,
        on_commit: Option<CommitCallback>,
    ) -> Self {
        let mut selector = Self {
            state: SelectorState::Reading,
            context: SelectorContext::default(),
        };
        selector.send(SelectorEvent::SetValues {
            value: value.into(),
            values,
            on_commit,
        });
        selector
    }

    pub fn send(&mut self, event: SelectorEvent) -> Vec<SelectorEffect> {
        let name = event.name();
        let context = std::mem::take(&mut self.context);
        let Transition {
            state,
            context,
            effects,
            handled,
        } = transition(self.state, context, event);

        if !handled {
            trace!(event = name, state = ?self.state, "selector event ignored");
        } else if state != self.state {
            debug!(event = name, from = ?self.state, to = ?state, "selector transition");
        }
        self.state = state;
        self.context = context;

        for effect in &effects {
            match effect {
                SelectorEffect::Committed(value) => {
                    info!(dataset = %value, "dataset committed");
                    if let Some(on_commit) = &self.context.on_commit {
                        on_commit(value);
                    }
                }
                SelectorEffect::Rejected(error) => {
                    debug!(id = %error.id, message = %error.error, "commit rejected");
                }
            }
        }

        effects
    }

    /// Leaving the input abandons the edit unless the pointer is over the
    /// result list, where a click is about to commit.
    pub fn unfocus_input(&mut self) -> Vec<SelectorEffect> {
        let mut effects = self.send(SelectorEvent::UnfocusInput);
        if self.state.is_editing() && !self.state.is_hovering_results() {
            effects.extend(self.send(SelectorEvent::Blur));
        }
        effects
    }

    pub fn select_result(&mut self, index: usize) -> Vec<SelectorEffect> {
        match self.context.results.get(index).cloned() {
            Some(value) => self.send(SelectorEvent::Commit(value)),
            None => Vec::new(),
        }
    }

    /// Replaces the typed text with the inline completion, if any.
    pub fn accept_best_match(&mut self) -> Vec<SelectorEffect> {
        match self.context.best_match.as_ref().map(|m| m.value.clone()) {
            Some(value) => self.send(SelectorEvent::Change(value)),
            None => Vec::new(),
        }
    }

    pub fn commit_input(&mut self) -> Vec<SelectorEffect> {
        let value = self.context.value.clone();
        self.send(SelectorEvent::Commit(value))
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn context(&self) -> &SelectorContext {
        &self.context
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn value(&self) -> &str {
        &self.context.value
    }

    pub fn committed(&self) -> &str {
        &self.context.committed
    }

    pub fn values(&self) -> &[String] {
        &self.context.values
    }

    pub fn results(&self) -> &[String] {
        &self.context.results
    }

    pub fn current_result(&self) -> Option<usize> {
        self.context.current_result
    }

    pub fn best_match(&self) -> Option<&BestMatch> {
        self.context.best_match.as_ref()
    }

    pub fn error(&self) -> Option<&CommitError> {
        self.context.error.as_ref()
    }
}
