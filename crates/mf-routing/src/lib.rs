//! `mf-routing` — the routing-oracle seam.
//!
//! Computing shortest paths is not this workspace's job.  The dispatcher only
//! needs "depart from link A at time t, arrive at link B when, and how far
//! was it?", which is what [`Router`] answers.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`router`] | `Router` trait, `Path`                                   |
//! | [`table`]  | `TravelTimeTable` — deterministic lookup-table router    |
//! | [`error`]  | `RoutingError`, `RoutingResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod router;
pub mod table;


pub use error::{RoutingError, RoutingResult};
pub use router::{Path, Router};
pub use table::TravelTimeTable;
