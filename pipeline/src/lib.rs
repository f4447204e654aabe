//! The main witcalc lib, used to go from a compiled circuit graph to a
//! witness.

#![deny(clippy::print_stdout)]

pub mod inputs;
pub mod pipeline;
pub mod test_util;
pub mod vectors;

pub use pipeline::Pipeline;
pub use pipeline::Stage;
