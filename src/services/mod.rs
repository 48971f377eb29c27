pub mod page_classifier;
pub mod sink;
pub mod table_extractor;

pub use page_classifier::PageClassifier;
pub use sink::{FileSink, Sink};
pub use table_extractor::{ParsedPage, TableExtractor, TableLocator, DEFAULT_CONTAINER};
