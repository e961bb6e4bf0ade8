//! Backend worker: owns the async runtime that performs remote calls.

pub mod commands;
pub mod runtime;
