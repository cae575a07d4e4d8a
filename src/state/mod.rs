pub mod app_state;
pub mod hunk_state;
pub mod pane_state;

pub use app_state::AppState;
pub use hunk_state::HunkNavigator;
pub use pane_state::{PanePair, Side};
