// File: src/platforms/dentalink/requests/mod.rs

pub mod appointments;
pub mod availability;
