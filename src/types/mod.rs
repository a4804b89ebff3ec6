// Markshelf shared type definitions
// Each submodule defines types used across the engine, storage and screens.

pub mod bookmark;
pub mod category;
pub mod errors;
pub mod settings;
