use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::AppEvent;
use crate::runtime::scheduler::SchedulerCommand;
use crate::selector::{DatasetSelector, SelectorEffect, SelectorEvent};
use crate::state::AppState;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseKind};

/// Scheduler key for the transient commit-error display.
pub const ERROR_TIMER: &str = "commit-error";

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut AppState, command: Command) -> Vec<Effect> {
        match command {
            Command::Exit => {
                state.request_exit();
                vec![]
            }
            Command::Refresh => {
                state.header_mut().activate_logo();
                state.reload_config();
                vec![Effect::RequestRender]
            }
            Command::Edit => selector_op(state, |s| s.send(SelectorEvent::Edit)),
            Command::Blur => selector_op(state, |s| s.send(SelectorEvent::Blur)),
            Command::Commit => {
                if is_editing(state) {
                    selector_op(state, DatasetSelector::commit_input)
                } else {
                    selector_op(state, |s| s.send(SelectorEvent::Edit))
                }
            }
            Command::NextResult => {
                if is_editing(state) {
                    selector_op(state, |s| s.send(SelectorEvent::NextResult))
                } else {
                    selector_op(state, |s| s.send(SelectorEvent::Edit))
                }
            }
            Command::PreviousResult => {
                selector_op(state, |s| s.send(SelectorEvent::PreviousResult))
            }
            Command::AcceptCompletion => selector_op(state, DatasetSelector::accept_best_match),
            Command::ClearInput => {
                selector_op(state, |s| s.send(SelectorEvent::Change(String::new())))
            }
            Command::InputKey(key) => input_key(state, key),
            Command::Pointer(mouse) => pointer(state, mouse),
            Command::ExpireError(id) => {
                if state.header_mut().expire_error(id) {
                    vec![Effect::RequestRender]
                } else {
                    vec![]
                }
            }
            Command::Tick => vec![],
        }
    }
}

fn is_editing(state: &AppState) -> bool {
    state.header().selector().is_editing()
}

/// Runs `op` against the selector and turns its effects into runtime
/// effects: a rejected commit arms the error timer, leaving edit mode with an
/// error on screen disarms it.
fn selector_op<F>(state: &mut AppState, op: F) -> Vec<Effect>
where
    F: FnOnce(&mut DatasetSelector) -> Vec<SelectorEffect>,
{
    let had_error = state.header().visible_error().is_some();
    let delay = state.error_timeout();
    let effects = state.header_mut().apply(op);

    let mut out = vec![Effect::RequestRender];
    for effect in effects {
        if let SelectorEffect::Rejected(error) = effect {
            out.push(Effect::Schedule(SchedulerCommand::Debounce {
                key: ERROR_TIMER.to_string(),
                delay,
                event: AppEvent::Command(Command::ExpireError(error.id)),
            }));
        }
    }
    if had_error && state.header().visible_error().is_none() {
        out.push(Effect::Schedule(SchedulerCommand::Cancel {
            key: ERROR_TIMER.to_string(),
        }));
    }
    out
}

fn input_key(state: &mut AppState, key: KeyEvent) -> Vec<Effect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
    {
        return vec![];
    }

    if is_editing(state) {
        let mut value = state.header().selector().value().to_string();
        match key.code {
            KeyCode::Char(ch) => value.push(ch),
            KeyCode::Backspace => {
                if value.pop().is_none() {
                    return vec![];
                }
            }
            _ => return vec![],
        }
        return selector_op(state, move |s| {
            let mut effects = Vec::new();
            if !s.state().is_input_focused() {
                effects.extend(s.send(SelectorEvent::FocusInput));
            }
            effects.extend(s.send(SelectorEvent::Change(value)));
            effects
        });
    }

    match key.code {
        KeyCode::Char('/') | KeyCode::Char('e') => {
            selector_op(state, |s| s.send(SelectorEvent::Edit))
        }
        KeyCode::Char('q') => {
            state.request_exit();
            vec![]
        }
        _ => vec![],
    }
}

fn pointer(state: &mut AppState, mouse: MouseEvent) -> Vec<Effect> {
    let layout = state.layout().clone();
    let editing = is_editing(state);

    match mouse.kind {
        MouseKind::Moved => {
            if !editing {
                return vec![];
            }
            let over_results = layout.result_at(mouse.row).is_some();
            let hovering = state.header().selector().state().is_hovering_results();
            match (over_results, hovering) {
                (true, false) => selector_op(state, |s| s.send(SelectorEvent::MouseEnterResults)),
                (false, true) => selector_op(state, |s| s.send(SelectorEvent::MouseLeaveResults)),
                _ => vec![],
            }
        }
        MouseKind::Click => {
            if layout.hits_logo(mouse.col, mouse.row) {
                return Reducer::reduce(state, Command::Refresh);
            }
            if editing && let Some(index) = layout.result_at(mouse.row) {
                return selector_op(state, |s| s.select_result(index));
            }
            if layout.hits_selector(mouse.col, mouse.row) {
                let event = if editing {
                    SelectorEvent::FocusInput
                } else {
                    SelectorEvent::Edit
                };
                return selector_op(state, |s| s.send(event));
            }
            if editing {
                return selector_op(state, DatasetSelector::unfocus_input);
            }
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendMessage, ChannelBackend};
    use crate::config::{ConfigStore, StaticQuerySource};
    use crate::header::{Header, HeaderOptions};
    use crate::selector::SelectorState;
    use std::sync::Arc;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;

    fn app(active: &str, datasets: &[&str]) -> (AppState, Receiver<BackendMessage>) {
        let (tx, rx) = mpsc::channel();
        let header = Header::new(
            HeaderOptions::default(),
            active,
            datasets.iter().map(|d| d.to_string()).collect(),
            Arc::new(ChannelBackend::new(tx)),
        );
        let state = AppState::new(
            header,
            ConfigStore::new(),
            Box::new(StaticQuerySource::default()),
            Duration::from_secs(3),
        );
        (state, rx)
    }

    fn press(state: &mut AppState, code: KeyCode) -> Vec<Effect> {
        Reducer::reduce(state, Command::InputKey(KeyEvent::plain(code)))
    }

    fn type_text(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            press(state, KeyCode::Char(ch));
        }
    }

    fn click(state: &mut AppState, col: u16, row: u16) -> Vec<Effect> {
        Reducer::reduce(
            state,
            Command::Pointer(MouseEvent {
                kind: MouseKind::Click,
                col,
                row,
            }),
        )
    }

    #[test]
    fn typing_completing_and_committing() {
        let (mut state, rx) = app("", &["alpha", "beta", "gamma"]);
        press(&mut state, KeyCode::Char('/'));
        assert!(is_editing(&state));

        type_text(&mut state, "be");
        assert_eq!(state.header().selector().value(), "be");
        Reducer::reduce(&mut state, Command::AcceptCompletion);
        assert_eq!(state.header().selector().value(), "beta");

        Reducer::reduce(&mut state, Command::Commit);
        assert!(!is_editing(&state));
        assert_eq!(state.header().selector().committed(), "beta");
        assert_eq!(rx.try_recv().expect("sent"), BackendMessage::set_dataset("beta"));
    }

    #[test]
    fn rejected_commit_arms_error_timer() {
        let (mut state, rx) = app("", &["alpha", "beta"]);
        Reducer::reduce(&mut state, Command::Edit);
        type_text(&mut state, "bet");

        let effects = Reducer::reduce(&mut state, Command::Commit);
        let id = state.header().visible_error().expect("error shown").id;
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Schedule(SchedulerCommand::Debounce {
                event: AppEvent::Command(Command::ExpireError(expiring)),
                ..
            }) if *expiring == id
        )));
        assert!(rx.try_recv().is_err());

        let effects = Reducer::reduce(&mut state, Command::ExpireError(id));
        assert!(matches!(effects.as_slice(), [Effect::RequestRender]));
        assert!(state.header().visible_error().is_none());
        assert!(is_editing(&state));
    }

    #[test]
    fn blur_with_error_disarms_timer() {
        let (mut state, _rx) = app("alpha", &["alpha"]);
        Reducer::reduce(&mut state, Command::Edit);
        type_text(&mut state, "x");
        Reducer::reduce(&mut state, Command::Commit);

        let effects = Reducer::reduce(&mut state, Command::Blur);
        assert!(effects.iter().any(|effect| matches!(
            effect,
            Effect::Schedule(SchedulerCommand::Cancel { key }) if key == ERROR_TIMER
        )));
        assert_eq!(state.header().selector().value(), "alpha");
    }

    #[test]
    fn backspace_edits_input() {
        let (mut state, _rx) = app("", &["alpha"]);
        Reducer::reduce(&mut state, Command::Edit);
        type_text(&mut state, "alx");
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.header().selector().value(), "al");
        Reducer::reduce(&mut state, Command::ClearInput);
        assert_eq!(state.header().selector().value(), "");
        assert!(press(&mut state, KeyCode::Backspace).is_empty());
    }

    #[test]
    fn reading_keys_open_editor_or_quit() {
        let (mut state, _rx) = app("", &["alpha"]);
        Reducer::reduce(&mut state, Command::NextResult);
        assert!(is_editing(&state));
        Reducer::reduce(&mut state, Command::Blur);

        press(&mut state, KeyCode::Char('q'));
        assert!(state.should_exit());
    }

    #[test]
    fn logo_click_refreshes() {
        let (mut state, rx) = app("", &["alpha"]);
        click(&mut state, 0, 0);
        assert!(state.header().is_refreshing());
        assert_eq!(rx.try_recv().expect("sent"), BackendMessage::refresh());
    }

    #[test]
    fn hovering_then_clicking_a_result_commits_it() {
        let (mut state, rx) = app("", &["alpha", "beta"]);
        let selector_col = state.layout().selector.start;
        click(&mut state, selector_col, 0);
        assert!(is_editing(&state));
        state.view();

        let row = state.layout().results_row + 1;
        Reducer::reduce(
            &mut state,
            Command::Pointer(MouseEvent {
                kind: MouseKind::Moved,
                col: selector_col,
                row,
            }),
        );
        assert!(state.header().selector().state().is_hovering_results());

        click(&mut state, selector_col, row);
        assert_eq!(state.header().selector().committed(), "beta");
        assert_eq!(rx.try_recv().expect("sent"), BackendMessage::set_dataset("beta"));
    }

    #[test]
    fn clicking_elsewhere_abandons_edit() {
        let (mut state, rx) = app("alpha", &["alpha", "beta"]);
        Reducer::reduce(&mut state, Command::Edit);
        type_text(&mut state, "zz");
        state.view();

        let below = state.layout().results_row + 10;
        click(&mut state, 0, below);
        assert_eq!(state.header().selector().state(), SelectorState::Reading);
        assert_eq!(state.header().selector().value(), "alpha");
        assert!(rx.try_recv().is_err());
    }
}
