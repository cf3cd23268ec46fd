pub mod actions;
mod app_state;
mod auth_session;
mod bubble;
mod bubble_list;
pub mod clipboard;
pub mod events;
mod scroll;

pub use app_state::*;
pub use auth_session::*;
pub use bubble::*;
pub use bubble_list::*;
pub use scroll::*;
