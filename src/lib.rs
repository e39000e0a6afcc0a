//! dracut-module library exports for testing.
//!
//! The binary is an Ansible binary module; everything it does is reachable
//! from here so integration tests can drive it without the host.

pub mod command;
pub mod config;
pub mod logging;
pub mod module;
pub mod params;
pub mod process;
pub mod result;
pub mod timing;
