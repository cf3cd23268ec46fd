mod action;
mod auth;
mod author;
mod conversation;
mod event;
mod intent;
mod loading;
mod message;
mod notification;
mod slash_commands;
mod starters;
mod textarea;
mod transport;

pub use action::*;
pub use auth::*;
pub use author::*;
pub use conversation::*;
pub use event::*;
pub use intent::*;
pub use loading::*;
pub use message::*;
pub use notification::*;
pub use slash_commands::*;
pub use starters::*;
pub use textarea::*;
pub use transport::*;
