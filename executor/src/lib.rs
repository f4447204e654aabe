//! Tooling used for the execution of compiled circuit graphs

#![deny(clippy::print_stdout)]

pub mod witgen;
pub mod wtns;
