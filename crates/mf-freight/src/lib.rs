//! `mf-freight` — freight tour plans and their conversion into tasks.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`plan`]    | `FreightTourPlan`, `TourStop`                             |
//! | [`convert`] | `convert_tour`, `ConvertedTour`                           |
//! | [`manager`] | `TourManager` trait, `TourRequest`, `TourQueue`           |
//! | [`loader`]  | CSV loading of pre-planned tours                          |
//! | [`error`]   | `FreightError`, `FreightResult<T>`                        |
//!
//! Tours are planned elsewhere; this crate only carries them and turns them
//! into schedule tasks.

pub mod convert;
pub mod error;
pub mod loader;
pub mod manager;
pub mod plan;

#[cfg(test)]
mod tests;

pub use convert::{ConvertedTour, convert_tour};
pub use error::{FreightError, FreightResult};
pub use loader::{load_tours_csv, load_tours_reader};
pub use manager::{TourManager, TourQueue, TourRequest, TourRequestContext};
pub use plan::{FreightTourPlan, TourStop};
