//! Application services shared by the HTTP handlers.

pub mod backup;
pub mod catalog;
