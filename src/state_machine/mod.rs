//! statig state machines.

pub mod spin_sm;
