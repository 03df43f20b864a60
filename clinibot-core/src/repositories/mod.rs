// src/repositories/mod.rs

pub mod postgres;
pub mod memory;

pub use clinibot_common::traits::repository_traits::UserStore;
pub use postgres::PostgresUserStore;
pub use memory::InMemoryUserStore;
