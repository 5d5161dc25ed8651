//! Models loaded from the environment.

pub mod config;
