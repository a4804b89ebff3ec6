// Markshelf services
// Stateless helpers around the engine: settings persistence.

pub mod settings_engine;
