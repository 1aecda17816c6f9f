//! Core library for the docmatch annotation tool.
//!
//! The session manager ([`services::session`]) owns the CSV-backed work
//! queue and judgment ledger; the renderer ([`render`]) lays a pair of
//! documents out side by side; the display layer ([`display`]) talks to
//! the operator through an external editor and the terminal.

pub mod cli;
pub mod config;
pub mod display;
pub mod models;
pub mod render;
pub mod services;
