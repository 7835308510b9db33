//! Shared inventory logic: ports, row projection, and the session controller

pub mod controller;
pub mod ports;
pub mod view;
