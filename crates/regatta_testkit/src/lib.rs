//! # Regatta Testkit
//!
//! Test utilities for the regatta store.
//!
//! This crate provides:
//! - Temporary workspaces holding an editor, a backup ledger and documents
//! - Property-based test generators using proptest
//! - Cross-crate scenarios exercising the editor, binder and ledger together
//! - Log capture setup for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use regatta_testkit::prelude::*;
//!
//! #[test]
//! fn races_get_ids() {
//!     with_workspace(|ws| {
//!         let doc = ws.sample_document("event.orcsc");
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::logging::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use logging::*;
