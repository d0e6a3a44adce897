//! Backend side of the GUI: command types and the worker runtime.

pub mod commands;
pub mod runtime;
