//! Trait seams consumed by the engine.

mod migration_sink;

pub use migration_sink::{InMemoryMigrationSink, JsonLinesSink, MigrationSink};
