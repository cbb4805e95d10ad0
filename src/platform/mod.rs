//! OS bindings for the capability traits the core is written against.

#[cfg(target_os = "windows")]
pub mod windows;
