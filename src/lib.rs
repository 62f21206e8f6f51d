//! User Admin API Library
//!
//! This library provides the core functionality for the user administration
//! API: the response envelope contract, input validation, store error
//! translation, and the user controller with its repository adapters.

pub mod api;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod infrastructure;
