//! Common utilities for the CreamTint repaint engine.
//!
//! This crate provides shared infrastructure used by the other components:
//! - **Warning System** - colored terminal output for unsupported color syntaxes

pub mod warning;
