//! `mf-core` — foundational types for the `mixfleet` dispatcher.
//!
//! This crate is a dependency of every other `mf-*` crate.  It has no `mf-*`
//! dependencies and only `thiserror` (plus optional `serde`) from outside.
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `VehicleId`, `LinkId`, `RequestId`, `ServiceId`, `TourId`  |
//! | [`time`]   | `SimTime`, `SimClock`                                      |
//! | [`config`] | `DispatchConfig` — the dispatch policy switches            |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DispatchConfig;
pub use error::{CoreError, CoreResult};
pub use ids::{LinkId, RequestId, ServiceId, TourId, VehicleId};
pub use time::{SimClock, SimTime};
