//! Integration test crate for FrameCut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple framecut crates to verify they work together.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod resolution;
