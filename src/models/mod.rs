pub mod page;
pub mod record;

pub use page::{PageClass, PageIndex, PageOutcome, RawPage, StopSignal};
pub use record::{collect_columns, Record, ResultSet};
