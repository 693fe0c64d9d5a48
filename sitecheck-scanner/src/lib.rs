pub mod browser;
pub mod crawler;
pub mod error;
pub mod filter;
pub mod frontier;
pub mod result;
pub mod seeds;

pub use browser::{BrowserSession, PageProbe};
pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use filter::UrlFilter;
pub use frontier::Frontier;
pub use result::{PageResult, RequestFailure};
