pub mod engine;
pub mod input;
pub mod result;
pub mod settings;
pub mod stats;
