pub mod logger;

pub use logger::AnalyticsLogger;
