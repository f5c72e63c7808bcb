//! Key vocabulary.  The core only ever sees one `Option<char>` per tick.

/// What a key press means to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Interact,
    Fire,
    Start,
    Restart,
    Quit,
}

impl Command {
    /// Map a key to a command.  Case-insensitive; unknown keys give `None`.
    ///
    /// Space doubles as "start" on the menu, so the mapping of `' '` depends
    /// on context and is resolved by the simulation step, not here.
    pub fn from_key(key: char) -> Option<Self> {
        let cmd = match key.to_ascii_lowercase() {
            'w' => Self::Forward,
            's' => Self::Backward,
            'a' => Self::StrafeLeft,
            'd' => Self::StrafeRight,
            'q' => Self::TurnLeft,
            'e' => Self::TurnRight,
            'f' => Self::Interact,
            ' ' => Self::Fire,
            '\n' | '\r' => Self::Start,
            'r' => Self::Restart,
            'x' | '\x1b' => Self::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Non-blocking key source: at most one key per call, `None` when idle.
pub trait InputSource {
    fn poll_key(&mut self) -> Option<char>;
}

/// Plays back a fixed key sequence, then reports no input forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    keys: std::collections::VecDeque<Option<char>>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Option<char>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll_key(&mut self) -> Option<char> {
        self.keys.pop_front().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_case_insensitive() {
        assert_eq!(Command::from_key('W'), Some(Command::Forward));
        assert_eq!(Command::from_key('w'), Some(Command::Forward));
        assert_eq!(Command::from_key('X'), Some(Command::Quit));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(Command::from_key('z'), None);
        assert_eq!(Command::from_key('7'), None);
    }

    #[test]
    fn scripted_input_runs_dry() {
        let mut input = ScriptedInput::new([Some('w'), None, Some('f')]);
        assert_eq!(input.poll_key(), Some('w'));
        assert_eq!(input.poll_key(), None);
        assert_eq!(input.poll_key(), Some('f'));
        assert_eq!(input.poll_key(), None);
    }
}
