pub mod myntra_api;
pub mod page;
pub mod util;

pub use myntra_api::MyntraApiFetcher;
pub use page::PageFetcher;
