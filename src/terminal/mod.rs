pub mod backend;

pub use backend::{
    KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseKind, Terminal, TerminalEvent, TerminalSize,
};
