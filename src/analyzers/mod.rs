//! Statistics passes over the filtered trips.
//!
//! Each pass reads the kept set (duration and demographic also read the
//! overdue and underage partitions) and returns a serializable summary.
//! [`analyzer::analyze`] runs the filter stage and all four passes.

pub mod analyzer;
pub mod demographic;
pub mod duration;
pub mod station;
pub mod temporal;
pub mod types;
pub mod utility;
