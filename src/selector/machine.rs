//! Dataset selector state machine.
//!
//! `Reading` shows the committed dataset. `Edit` enters `Editing`, which
//! tracks two orthogonal regions: whether the text input holds focus and
//! whether the pointer hovers the result list. Transitions are pure: the
//! context is moved in and a fresh one is handed back alongside any effects.

use crate::selector::commit::CommitError;
use crate::selector::search::{BestMatch, best_match, matching_results};
use std::fmt;
use std::sync::Arc;

/// Invoked with the dataset name whenever a commit changes the selection.
pub type CommitCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRegion {
    Focused,
    Unfocused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsRegion {
    Hovering,
    NotHovering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorState {
    Reading,
    Editing {
        input: InputRegion,
        results: ResultsRegion,
    },
}

impl SelectorState {
    /// Entry state of `Editing`.
    pub fn editing() -> Self {
        Self::Editing {
            input: InputRegion::Focused,
            results: ResultsRegion::NotHovering,
        }
    }

    pub fn is_editing(self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn is_hovering_results(self) -> bool {
        matches!(
            self,
            Self::Editing {
                results: ResultsRegion::Hovering,
                ..
            }
        )
    }

    pub fn is_input_focused(self) -> bool {
        matches!(
            self,
            Self::Editing {
                input: InputRegion::Focused,
                ..
            }
        )
    }
}

#[derive(Clone, Default)]
pub struct SelectorContext {
    /// Known dataset names.
    pub values: Vec<String>,
    /// Text currently shown in the input.
    pub value: String,
    /// Last accepted dataset name, `""` when nothing is selected.
    pub committed: String,
    /// Text at the moment editing started.
    pub prev_value: String,
    pub current_result: Option<usize>,
    pub results: Vec<String>,
    pub best_match: Option<BestMatch>,
    pub error: Option<CommitError>,
    pub on_commit: Option<CommitCallback>,
}

impl fmt::Debug for SelectorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorContext")
            .field("values", &self.values)
            .field("value", &self.value)
            .field("committed", &self.committed)
            .field("prev_value", &self.prev_value)
            .field("current_result", &self.current_result)
            .field("results", &self.results)
            .field("best_match", &self.best_match)
            .field("error", &self.error)
            .field("on_commit", &self.on_commit.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub enum SelectorEvent {
    SetValues {
        value: String,
        values: Vec<String>,
        on_commit: Option<CommitCallback>,
    },
    Edit,
    Change(String),
    NextResult,
    PreviousResult,
    FocusInput,
    UnfocusInput,
    MouseEnterResults,
    MouseLeaveResults,
    Blur,
    Commit(String),
}

impl SelectorEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetValues { .. } => "SET_VALUES",
            Self::Edit => "EDIT",
            Self::Change(_) => "CHANGE",
            Self::NextResult => "NEXT_RESULT",
            Self::PreviousResult => "PREVIOUS_RESULT",
            Self::FocusInput => "FOCUS_INPUT",
            Self::UnfocusInput => "UNFOCUS_INPUT",
            Self::MouseEnterResults => "MOUSEENTER_RESULTS",
            Self::MouseLeaveResults => "MOUSELEAVE_RESULTS",
            Self::Blur => "BLUR",
            Self::Commit(_) => "COMMIT",
        }
    }
}

impl fmt::Debug for SelectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetValues { value, values, .. } => f
                .debug_struct("SetValues")
                .field("value", value)
                .field("values", &values.len())
                .finish_non_exhaustive(),
            Self::Change(value) => f.debug_tuple("Change").field(value).finish(),
            Self::Commit(value) => f.debug_tuple("Commit").field(value).finish(),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEffect {
    /// A commit changed the selected dataset.
    Committed(String),
    Rejected(CommitError),
}

#[derive(Debug)]
pub struct Transition {
    pub state: SelectorState,
    pub context: SelectorContext,
    pub effects: Vec<SelectorEffect>,
    /// `false` when the event is not accepted in the current state.
    pub handled: bool,
}

impl Transition {
    fn to(state: SelectorState, context: SelectorContext) -> Self {
        Self {
            state,
            context,
            effects: Vec::new(),
            handled: true,
        }
    }

    fn ignored(state: SelectorState, context: SelectorContext) -> Self {
        Self {
            state,
            context,
            effects: Vec::new(),
            handled: false,
        }
    }

    fn with_effect(mut self, effect: SelectorEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn transition(
    state: SelectorState,
    context: SelectorContext,
    event: SelectorEvent,
) -> Transition {
    use SelectorEvent as E;
    use SelectorState as S;

    match (state, event) {
        (
            _,
            E::SetValues {
                value,
                values,
                on_commit,
            },
        ) => set_values(value, values, on_commit),
        (S::Reading, E::Edit) => {
            let best_match = best_match(&context.value, &context.values);
            let context = SelectorContext {
                prev_value: context.value.clone(),
                results: context.values.clone(),
                current_result: None,
                best_match,
                ..context
            };
            Transition::to(S::editing(), context)
        }
        (S::Editing { .. }, E::Change(value)) => {
            let results = matching_results(&value, &context.values);
            let current_result = results
                .iter()
                .position(|result| *result == value)
                .filter(|index| *index > 0);
            let best_match = best_match(&value, &context.values);
            let context = SelectorContext {
                value,
                results,
                current_result,
                best_match,
                ..context
            };
            Transition::to(state, context)
        }
        (S::Editing { .. }, E::NextResult) => {
            let current_result = match (context.results.len(), context.current_result) {
                (0, _) => None,
                (_, None) => Some(0),
                (len, Some(index)) => Some((index + 1).min(len - 1)),
            };
            let value = current_result
                .and_then(|index| context.results.get(index).cloned())
                .unwrap_or_else(|| context.value.clone());
            let context = SelectorContext {
                value,
                current_result,
                best_match: None,
                ..context
            };
            Transition::to(state, context)
        }
        (S::Editing { .. }, E::PreviousResult) => {
            let (current_result, value) = match context.current_result {
                None | Some(0) => (None, context.prev_value.clone()),
                Some(index) => match context.results.get(index - 1) {
                    Some(result) => (Some(index - 1), result.clone()),
                    None => (None, context.prev_value.clone()),
                },
            };
            let context = SelectorContext {
                value,
                current_result,
                best_match: None,
                ..context
            };
            Transition::to(state, context)
        }
        (S::Editing { results, .. }, E::FocusInput) => Transition::to(
            S::Editing {
                input: InputRegion::Focused,
                results,
            },
            context,
        ),
        (S::Editing { results, .. }, E::UnfocusInput) => Transition::to(
            S::Editing {
                input: InputRegion::Unfocused,
                results,
            },
            context,
        ),
        (S::Editing { input, .. }, E::MouseEnterResults) => Transition::to(
            S::Editing {
                input,
                results: ResultsRegion::Hovering,
            },
            context,
        ),
        (S::Editing { input, .. }, E::MouseLeaveResults) => Transition::to(
            S::Editing {
                input,
                results: ResultsRegion::NotHovering,
            },
            context,
        ),
        (S::Editing { .. }, E::Blur) => {
            let context = SelectorContext {
                value: context.prev_value.clone(),
                ..context
            };
            Transition::to(S::Reading, into_reading(context))
        }
        (S::Editing { .. }, E::Commit(value)) => {
            if context.values.contains(&value) {
                let changed = value != context.committed;
                let context = SelectorContext {
                    committed: value.clone(),
                    value: value.clone(),
                    prev_value: value.clone(),
                    ..context
                };
                let accepted = Transition::to(S::Reading, into_reading(context));
                if changed {
                    accepted.with_effect(SelectorEffect::Committed(value))
                } else {
                    accepted
                }
            } else {
                let error = CommitError::unknown_value(&value);
                let context = SelectorContext {
                    error: Some(error.clone()),
                    ..context
                };
                Transition::to(state, context).with_effect(SelectorEffect::Rejected(error))
            }
        }
        (state, _) => Transition::ignored(state, context),
    }
}

fn set_values(
    value: String,
    values: Vec<String>,
    on_commit: Option<CommitCallback>,
) -> Transition {
    let committed = if value.is_empty() || values.contains(&value) {
        value
    } else {
        tracing::warn!(dataset = %value, "active dataset is not a known dataset; clearing selection");
        String::new()
    };
    let context = SelectorContext {
        values,
        value: committed.clone(),
        prev_value: committed.clone(),
        committed,
        on_commit,
        ..SelectorContext::default()
    };
    Transition::to(SelectorState::Reading, context)
}

fn into_reading(context: SelectorContext) -> SelectorContext {
    SelectorContext {
        current_result: None,
        results: Vec::new(),
        best_match: None,
        error: None,
        ..context
    }
}
