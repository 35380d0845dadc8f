#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod render;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use error::WheelError;
pub use ir::WheelDoc;
pub use layout::{generate_all, generate_structure};
