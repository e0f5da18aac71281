//! Library crate for petshop-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - HTTP client for the customer registry API (`api`)
//! - Application state and update loop (`app`)
//! - Wire types for clients, addresses and phones (`model`)
//! - UI rendering and widgets (`ui`)
//! - Field validation and display formatting (`validate`)
//!
//! It is used by the `petshop-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod model;
pub mod ui;
pub mod validate;
