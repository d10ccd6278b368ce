// src/dev/mod.rs
// Helpers shared by the fuzz binary and the sweep tests.
pub mod generator;
