pub mod cli;
pub mod config;
pub mod database;
pub mod export;
pub mod filter;
pub mod genre;
pub mod library;
pub mod logging;
pub mod models;
pub mod period;
pub mod rules;
pub mod session;
pub mod tags;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use filter::ItemFilter;
pub use library::{Library, LibraryError};
pub use models::{Item, ItemEdit, Kind, Mood, NewItem, Status};
pub use utils::Profile;
