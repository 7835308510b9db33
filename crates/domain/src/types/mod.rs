//! Domain data types

pub mod feed;
pub mod item;

pub use feed::*;
pub use item::*;
