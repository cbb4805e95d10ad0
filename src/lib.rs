pub mod config;
pub mod controller;
pub mod cues;
pub mod geometry;
pub mod hotkey;
pub mod keys;
pub mod location_store;
pub mod logging;
pub mod menu;
pub mod overlay;
pub mod platform;
pub mod signals;
pub mod timer;
