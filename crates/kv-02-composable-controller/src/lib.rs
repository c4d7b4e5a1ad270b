//! # Composable Controller (KV-02)
//!
//! Merges the states of several independent controllers into one published
//! tree keyed by controller name.
//!
//! ```text
//! ┌───────────────────┐
//! │ KeyringController │──┐
//! └───────────────────┘  │ subscribe_value()  ┌──────────────────────┐  callback(&ComposedState)
//! ┌───────────────────┐  ├──────────────────▶ │ ComposableController │ ────────────────────────▶
//! │ PreferencesStore  │──┘                    └──────────────────────┘
//! └───────────────────┘
//! ```
//!
//! The aggregator only observes. Children are fixed at construction and hold
//! a weak handle back to the aggregator, so dropping it detaches everything.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod errors;
pub mod service;
pub mod state;

pub use errors::ComposeError;
pub use service::ComposableController;
pub use state::ComposedState;
