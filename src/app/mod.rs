//! The `ceq` application: argument parsing, the synthetic workload, and startup

pub mod cli;
pub mod demo;
pub mod startup;
