// File: src/crypto/mod.rs

pub mod rut;
pub mod signature;

pub use signature::SignatureVerifier;
