//! Controller mode transitions

/// Externally visible controller mode.
///
/// `Idle -> Loading -> {Ready | LoadFailed}`; `Ready -> Converting -> Ready`.
/// `LoadFailed` is not terminal: a new load attempt moves back to `Loading`.
/// `Converting` is never re-entered while already converting, which is what
/// keeps two conversion commands from interleaving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Idle,
    Loading,
    Ready,
    LoadFailed,
    Converting,
}

impl Mode {
    /// Start a load attempt. Never called while `Converting`: the controller
    /// is held exclusively for the whole conversion command.
    pub fn begin_load(&mut self) {
        *self = Mode::Loading;
    }

    pub fn finish_load(&mut self, ok: bool) {
        *self = if ok { Mode::Ready } else { Mode::LoadFailed };
    }

    /// Enter `Converting`. Refused unless the controller is `Ready`.
    #[must_use]
    pub fn try_begin_convert(&mut self) -> bool {
        if *self != Mode::Ready {
            return false;
        }
        *self = Mode::Converting;
        true
    }

    pub fn finish_convert(&mut self) {
        *self = Mode::Ready;
    }

    #[must_use]
    pub fn is_converting(self) -> bool {
        self == Mode::Converting
    }
}
