pub mod page_fetcher;
pub mod request_gate;

pub use page_fetcher::{PageFetcher, PageSource, PAGE_SIZE};
pub use request_gate::RequestGate;
