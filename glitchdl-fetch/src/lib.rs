pub mod error;
pub mod fetcher;
pub mod result;

pub use error::FetchError;
pub use fetcher::Fetcher;
pub use result::FetchResult;
