//! HTTP handlers

pub mod health;
pub mod meta;
pub mod model;
pub mod predict;
