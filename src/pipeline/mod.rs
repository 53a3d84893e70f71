// Pipelines that move articles through the engine and into the store.

pub mod batch;
