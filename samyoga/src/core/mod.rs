//! Core data types shared by the registration engines.

pub mod types;
