//! Operators.
//!
//! Every operator is a plain struct wrapping its source(s). Subscribing
//! wraps the downstream observer in the operator's own observer and hands
//! that to the source, so a chain of operators is a chain of observers.

pub mod combine_latest;
pub mod map;
pub mod merge;
pub mod observe_on;
pub mod reduce;
pub mod scan;
pub mod zip;
