pub mod report;

pub use report::{CrawlReport, WorkerExit, WorkerPhase, WorkerReport};
