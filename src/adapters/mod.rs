//! Implementations of the port traits.

pub mod live;
