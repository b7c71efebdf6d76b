//! # vtmenu
//!
//! A numbered terminal launcher. Each configured entry pairs a title with a command
//! template; the operator types `!N` plus optional parameters and the bound argument
//! vector is executed directly, never through a shell.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag raised by the interrupt handler and acknowledged by the menu controller.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
