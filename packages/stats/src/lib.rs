#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Count validation, aggregation and presentation.
//!
//! Records flow from the store through [`aggregate::aggregate`] into a
//! [`snapshot::Snapshot`], from which the map fill, ranked table and
//! tooltips are derived.

pub mod aggregate;
pub mod color;
pub mod rank;
pub mod snapshot;
pub mod tooltip;
pub mod validate;

pub use aggregate::{Aggregation, aggregate, summarize};
pub use color::color;
pub use rank::rank;
pub use snapshot::{DashboardStore, Snapshot};
pub use validate::{CountValue, RecordUpdate, ValidatedUpdate, ValidationError};
