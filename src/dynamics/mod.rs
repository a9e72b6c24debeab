//! Simulation stages: constraint relaxation, integration and the trace
//! worker pool.

pub mod integrator;
pub mod parallel;
pub mod solver;

pub use integrator::Integrator;
pub use parallel::{TraceOutcome, TracePool};
pub use solver::ConstraintSolver;
