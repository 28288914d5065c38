use crate::runtime::command::Command;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn from_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Keys with a fixed meaning in every selector state. Everything else is
/// passed to the reducer as `Command::InputKey`.
#[derive(Default)]
pub struct KeyBindings {
    bindings: HashMap<KeyBinding, Command>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = Self::default();
        bindings.install_defaults();
        bindings
    }

    pub fn bind(&mut self, key: KeyBinding, command: Command) {
        self.bindings.insert(key, command);
    }

    pub fn unbind(&mut self, key: &KeyBinding) {
        self.bindings.remove(key);
    }

    pub fn resolve(&self, event: KeyEvent) -> Option<Command> {
        self.bindings.get(&KeyBinding::from_event(event)).cloned()
    }

    fn install_defaults(&mut self) {
        self.bind(KeyBinding::ctrl(KeyCode::Char('c')), Command::Exit);
        self.bind(KeyBinding::ctrl(KeyCode::Char('r')), Command::Refresh);
        self.bind(KeyBinding::ctrl(KeyCode::Char('u')), Command::ClearInput);
        self.bind(KeyBinding::key(KeyCode::Esc), Command::Blur);
        self.bind(KeyBinding::key(KeyCode::Enter), Command::Commit);
        self.bind(KeyBinding::key(KeyCode::Down), Command::NextResult);
        self.bind(KeyBinding::key(KeyCode::Up), Command::PreviousResult);
        self.bind(KeyBinding::key(KeyCode::Tab), Command::AcceptCompletion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.resolve(KeyEvent {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL,
            }),
            Some(Command::Refresh)
        );
        assert_eq!(
            bindings.resolve(KeyEvent::plain(KeyCode::Enter)),
            Some(Command::Commit)
        );
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Char('r'))), None);
    }

    #[test]
    fn unbind_falls_back_to_input() {
        let mut bindings = KeyBindings::new();
        bindings.unbind(&KeyBinding::key(KeyCode::Tab));
        assert_eq!(bindings.resolve(KeyEvent::plain(KeyCode::Tab)), None);
    }
}
