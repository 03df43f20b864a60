// File: clinibot-core/tests/test_utils/mod.rs
pub mod helpers;
