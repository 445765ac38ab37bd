#![warn(clippy::unwrap_used)]

pub mod client;
pub mod local;
pub mod roster;

pub use client::RedisCache;
pub use local::LocalCache;
pub use roster::RosterDirectory;
