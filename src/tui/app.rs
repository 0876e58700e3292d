mod menu;
mod state;

pub(crate) use state::seat_label;
pub use state::{AppState, InputAction, Scene};
