pub mod config;
pub mod logs;
pub mod report;

pub use config::RunConfig;
pub use logs::{ContainerLogSource, LogSource, NullLogSource, RunWindow};
pub use report::{RunReport, RunSummary};
