pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod state;
pub mod views;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use state::SessionStore;
