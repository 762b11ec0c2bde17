mod options;
mod quarter_row;
mod summary;

pub use options::{AmountPolicy, ImportOptions};
pub use quarter_row::QuarterRow;
pub use summary::{ImportSummary, RowSkip};
