// ABOUTME: Library crate for the AMDR welcome wizard exposing public API for testing and the binary

#![allow(missing_docs)]

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod http;
pub mod keygen;
pub mod slider;
