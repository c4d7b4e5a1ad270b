//! # Shared Store - Observable State
//!
//! The state/subscriber base every controller builds on.
//!
//! ```text
//! ┌──────────────┐  put_state()   ┌─────────────────┐  callback(&S)  ┌────────────┐
//! │  Controller  │ ─────────────▶ │ ObservableStore │ ─────────────▶ │ Subscriber │
//! └──────────────┘                └─────────────────┘                └────────────┘
//! ```
//!
//! - [`ObservableStore`] notifies synchronously, in registration order, with
//!   the full new state. No lock is held while callbacks run.
//! - [`StateSource`] is the contract a component implements to be composed
//!   into an aggregate state.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod source;
pub mod store;

// Re-export main types
pub use source::{NamedStore, StateSource, ValueListener};
pub use store::{Listener, ObservableStore, SubscriptionId};
