//! UI-facing commands
//!
//! Thin async wrappers over the session controller. Every command logs
//! its outcome and duration with structured fields.

pub mod categories;
pub mod export;
pub mod items;
pub mod session;

pub use categories::*;
pub use export::*;
pub use items::*;
pub use session::*;
