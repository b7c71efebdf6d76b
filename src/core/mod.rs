// src/core/mod.rs

pub mod binder;
pub mod compiler;
pub mod config_loader;
pub mod dispatch;
pub mod input_parser;
pub mod paths;
pub mod registry;
