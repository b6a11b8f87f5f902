//! Scenario test suite for Grain allocation.
//!
//! Integration tests that drive the engine through whole harvests and
//! sequences of harvests, checking the arithmetic invariants end to end.

pub mod helpers;
