//! Smart City Library
//!
//! Subsystem registry and role-gated security access for a simulated city.

pub mod city;
