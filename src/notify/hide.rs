// ~/classic-menu/src/notify/hide.rs
// Forced removal of a tray notification that ignores the normal dismiss path

use std::time::Duration;

/// How long the icon stays hidden before it is shown again.
pub const HIDDEN_STATE_PAUSE: Duration = Duration::from_millis(500);

/// The tray primitives the forced hide is built from.
pub trait TrayIconOps {
    fn set_hidden(&self, hidden: bool);
    fn pause(&self, delay: Duration);
    fn clear_balloon(&self);
    fn redraw(&self);
}

/// Hides and re-shows the icon so the shell evicts the balloon, clears the
/// balloon text, then redraws the notification area and the host window.
pub fn force_hide(tray: &impl TrayIconOps) {
    tray.set_hidden(true);
    tray.pause(HIDDEN_STATE_PAUSE);
    tray.set_hidden(false);
    tray.clear_balloon();
    tray.redraw();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Step {
        Hidden(bool),
        Pause(Duration),
        Clear,
        Redraw,
    }

    #[derive(Default)]
    struct RecordingTray {
        steps: RefCell<Vec<Step>>,
    }

    impl TrayIconOps for RecordingTray {
        fn set_hidden(&self, hidden: bool) {
            self.steps.borrow_mut().push(Step::Hidden(hidden));
        }

        fn pause(&self, delay: Duration) {
            self.steps.borrow_mut().push(Step::Pause(delay));
        }

        fn clear_balloon(&self) {
            self.steps.borrow_mut().push(Step::Clear);
        }

        fn redraw(&self) {
            self.steps.borrow_mut().push(Step::Redraw);
        }
    }

    #[test]
    fn hide_toggles_icon_then_clears_and_redraws_in_order() {
        let tray = RecordingTray::default();

        force_hide(&tray);

        assert_eq!(
            *tray.steps.borrow(),
            vec![
                Step::Hidden(true),
                Step::Pause(Duration::from_millis(500)),
                Step::Hidden(false),
                Step::Clear,
                Step::Redraw,
            ]
        );
    }
}
