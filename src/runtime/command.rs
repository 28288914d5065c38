use crate::selector::ErrorId;
use crate::terminal::{KeyEvent, MouseEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    /// Same as clicking the logo.
    Refresh,
    Edit,
    Blur,
    Commit,
    NextResult,
    PreviousResult,
    AcceptCompletion,
    ClearInput,
    InputKey(KeyEvent),
    Pointer(MouseEvent),
    ExpireError(ErrorId),
    Tick,
}
