//! Request handlers.

pub mod classify;
pub mod health;
pub mod theme;

pub use classify::*;
pub use health::*;
pub use theme::*;
