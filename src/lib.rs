pub mod cli;
pub mod core;
pub mod deck;
pub mod markup;
pub mod persistence;
pub mod settings;
pub mod sources;
