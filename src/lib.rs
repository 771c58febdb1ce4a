pub mod bot;
pub mod card;
pub mod commands;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod ipinfo;

pub use bot::run;
