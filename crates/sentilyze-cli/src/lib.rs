pub mod cli;
pub mod config;
pub mod render;
pub mod server;

pub use cli::*;
pub use server::*;
