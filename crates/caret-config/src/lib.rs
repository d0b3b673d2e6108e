pub mod config;

pub use config::CaretConfig;
