// src/repositories/postgres/mod.rs

pub mod user_store;

pub use user_store::PostgresUserStore;
