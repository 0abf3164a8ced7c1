//! Application services: load, command, save.

pub mod command_handlers;
