// File: clinibot-common/src/traits/mod.rs
pub mod repository_traits;
pub mod api;

pub use repository_traits::UserStore;
pub use api::{MessageSender, SchedulingGateway};
