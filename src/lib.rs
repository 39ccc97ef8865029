//! Read-only overlay virtual filesystem for module-packaged web content.
//!
//! Independently packaged modules contribute routable content (pages,
//! scripts, styles) into a host application's resource namespace without
//! unpacking files onto disk. The native disk tree always answers first;
//! module-embedded stores fill the holes.

pub mod cache;
pub mod cli;
pub mod config;
pub mod embed;
pub mod logger;
pub mod module;
pub mod overlay;
pub mod path;
pub mod serve;
pub mod store;
pub mod utils;
