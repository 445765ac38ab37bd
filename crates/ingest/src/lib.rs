pub mod processor;

pub use processor::IngestProcessor;
