use bevy_ecs::resource::Resource;

/// The exported hover state: which named part the pointer is over, or
/// none. Written only by the picker on the render thread; the overlay
/// (and anything else) reads it through `active()`.
///
/// State machine: {Idle, Active(label)}.
/// - `enter` always wins, including over a different Active label.
/// - `leave` clears only if the leaving label is the active one; a
///   stale leave from a previously hovered region is a defined no-op,
///   so a delayed leave can never erase a newer enter.
#[derive(Resource, Default, Debug)]
pub struct InteractionState {
    active: Option<String>,
}

impl InteractionState {
    pub fn enter(&mut self, name: &str) {
        self.active = Some(name.to_owned());
    }

    pub fn leave(&mut self, name: &str) {
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        assert_eq!(InteractionState::default().active(), None);
    }

    #[test]
    fn enter_then_leave_returns_to_idle() {
        let mut state = InteractionState::default();
        state.enter("Monitor");
        assert_eq!(state.active(), Some("Monitor"));
        state.leave("Monitor");
        assert_eq!(state.active(), None);
    }

    #[test]
    fn stale_leave_is_a_no_op() {
        let mut state = InteractionState::default();
        state.enter("Keyboard");
        state.enter("Mouse");
        // The delayed leave from the old region must not clear Mouse.
        state.leave("Keyboard");
        assert_eq!(state.active(), Some("Mouse"));
    }

    #[test]
    fn last_enter_wins() {
        let mut state = InteractionState::default();
        state.enter("Tower");
        state.enter("Monitor");
        assert_eq!(state.active(), Some("Monitor"));
    }

    #[test]
    fn leave_while_idle_stays_idle() {
        let mut state = InteractionState::default();
        state.leave("Mouse");
        assert_eq!(state.active(), None);
    }
}
