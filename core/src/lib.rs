//! readiness-core — workforce-to-service readiness and matching engine.
//!
//! Three stateless components compute over one immutable snapshot:
//!   1. readiness — per-service skill coverage and deliverability
//!   2. scoring   — weighted member-to-service match scores
//!   3. planning  — deployment plans, gaps, and training priorities
//!
//! Data flows one way: snapshot -> readiness -> scoring -> planning.
//! Only planning calls the other two. Every output is a pure function of
//! the snapshot and the injected policy; nothing here persists anything.

pub mod config;
pub mod demo_roster;
pub mod error;
pub mod model;
pub mod planning;
pub mod readiness;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod store;
pub mod types;

pub use config::EnginePolicy;
pub use error::{EngineError, EngineResult};
pub use snapshot::EngineSnapshot;
pub use store::SnapshotStore;
