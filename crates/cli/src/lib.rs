//! Terminal front-end for the `kgw` kernel gateway picker.
//!
//! The binary wires the picker library to a line-oriented terminal: a
//! numbered-list chooser, a plain-text prompter, and a stderr failure
//! reporter, with gateway descriptors read from a JSON config file.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod styles;
pub mod terminal;
