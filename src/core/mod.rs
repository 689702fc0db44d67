pub mod classifier;
pub mod cycle;
pub mod geo;
pub mod resolver;
pub mod scheduler;

pub use crate::domain::model::{Coordinate, CycleOutcome, ErrorSignal, SignalDescriptor};
pub use crate::domain::ports::{Cycle, Geocoder, PositionSource, SignalSink};
pub use crate::utils::error::Result;
