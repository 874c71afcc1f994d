//! `mf-dispatch` — the mixed-duty dispatch state machine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                               |
//! |------------------|--------------------------------------------------------|
//! | [`dispatcher`]   | `Dispatcher` — completion handling, tour & trip insertion |
//! | [`vehicle`]      | `VehicleState`                                         |
//! | [`fleet`]        | `Fleet` — all vehicles, fleet-wide timeline refresh    |
//! | [`request`]      | `PassengerRequest`, `RequestStatus`                    |
//! | [`request_book`] | `RequestBook` — pre-booked trips by submission time    |
//! | [`observer`]     | `DispatchObserver`, `EventLog`, event records          |
//! | [`error`]        | `DispatchError`, `DispatchResult<T>`                   |
//!
//! # Step order
//!
//! ```text
//! host: vehicle's current task completes at `now`
//!   └─ Dispatcher::on_task_completed(vehicle, now, observer)
//!        ├─ timeline repair (current task ends at `now`)
//!        └─ decision by task kind → maybe TourManager / Router → tail swap
//! host: vehicle.schedule.advance()
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Rayon-parallel `Fleet::update_timelines`                |
//! | `serde`    | Serde derives on requests and event records             |

pub mod dispatcher;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod request;
pub mod request_book;
pub mod vehicle;


pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use fleet::Fleet;
pub use observer::{
    DispatchEvent, DispatchObserver, DispatchedTourRecord, EventLog, NoopObserver,
    RejectionReason, TourRejection,
};
pub use request::{PassengerRequest, RequestStatus};
pub use request_book::RequestBook;
pub use vehicle::VehicleState;
