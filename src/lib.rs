pub mod config;
pub mod error;
pub mod events;
pub mod gesture;
pub mod grid;
pub mod resize;
pub mod transfer;
pub mod workspace;
