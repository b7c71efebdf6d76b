//! # System Interaction Layer
//!
//! This module is the boundary between the launcher's core logic and the operating
//! system's process management.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns a bound command directly (never through a shell), hands it
//!   the terminal, and waits for it to exit. The `Launcher` trait is the seam the menu
//!   controller uses, so the core can be exercised without spawning anything.

pub mod executor;
