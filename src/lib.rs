//! Elevator dispatch and control core.
//!
//! A fleet of simulated elevator cars, each served by a worker thread of
//! its own, a cost-based assigner and a controller owning the global
//! request queue. Callers interact through three operations: submit a
//! travel request, snapshot the fleet, shut down. Request handles are
//! shared `Arc`s, so a submitter watches its request move through the
//! lifecycle while the serving car drives it.

pub mod assigner;
pub mod config;
pub mod controller;
pub mod debug;
pub mod elevator;
pub mod error;
pub mod request;
pub mod requests;

pub use config::{FleetConfig, TimingConfig};
pub use controller::Controller;
pub use elevator::{Behaviour, Elevator, ElevatorSnapshot};
pub use error::InvalidRequest;
pub use request::{Direction, Request, RequestStatus};
