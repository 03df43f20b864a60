// src/lib.rs

pub mod config;
pub mod crypto;
pub mod db;
pub mod repositories;
pub mod platforms;
pub mod eventbus;
pub mod services;
pub mod webhook;

pub use config::AppConfig;
pub use db::Database;
pub use clinibot_common::error::Error;
