//! Markshelf: a category-scoped bookmark store with live views.
//!
//! This library crate exposes all modules for use by presentation code and
//! integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod screens;
pub mod services;
pub mod storage;
pub mod types;
