//! flowboard-core
//!
//! Core building blocks for the flowboard project tracker: the ordering
//! model behind a drag-and-drop board and the metrics derived from a
//! card's status history.
//!
//! # Module map
//! - **domain**: records and ids (boards, cards, the transition log)
//! - **ordering**: status buckets, the move resolver, the WIP guard
//! - **metrics**: cycle time, velocity, health classification,
//!   forecasts, burndown
//! - **ports**: traits for data access, time, and id generation
//! - **impls**: in-memory implementations (demo and tests)
//! - **session**: one board's snapshot plus its derived views
//!
//! Everything computational is synchronous and side-effect-free; the
//! only async surface is the `BoardStore` port and the session methods
//! that drive it.

pub mod domain;
pub mod impls;
pub mod metrics;
pub mod ordering;
pub mod ports;
pub mod session;
