//! Dependency closure resolution: a lazy, depth-first walk over a package
//! database that yields every reachable package once, tagged as found or
//! missing.

pub mod available;
pub mod exclusion;
pub mod outcome;
pub mod resolver;
