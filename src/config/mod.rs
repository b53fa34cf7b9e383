pub mod build_config;
pub use self::build_config::BuildConfig;
mod config_loader;
pub use self::config_loader::ConfigLoader;
