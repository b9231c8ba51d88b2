// ABOUTME: Shared types and configuration for the pane layout engine.
// ABOUTME: Defines split geometry, size policies, and config file handling.

pub mod config;
pub mod geometry;

pub use config::{Config, ConfigError, LayoutSettings, LoggingSettings};
pub use geometry::{clamp_divider, Orientation, Position, Side, Size, SizePolicy};
