//! Terminal front-end: arguments, config, logging, effect execution and rendering.
mod app;
mod config;
mod effects;
mod logging;
mod render;

pub use app::run_app;
