pub mod commands;
pub mod config;
pub mod hooks;
pub mod host;
pub mod installer;
pub mod package;
pub mod runtime;
pub mod sync;
