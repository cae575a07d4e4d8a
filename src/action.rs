use crate::state::pane_state::Side;

/// Central action enum: all state mutations flow through here.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Resize,

    // Scrolling the focused pane
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollTop,
    ScrollBottom,
    ScrollLeft,
    ScrollRight,
    /// Mouse wheel over a specific pane, in rows.
    Wheel(Side, i32),

    // Focus
    SwitchFocus,

    // Hunks
    NextHunk,
    PrevHunk,

    // Documents
    Reload,
    CopyHunk,
    CopyDocument,

    // Display
    NextTheme,
    PrevTheme,
    ToggleConnectors,
    ToggleHints,
}
