pub mod detect;
pub mod frame;
pub mod io;

// Re-export the table types for convenient access (e.g. `use crate::sheet::RawTable`).
pub use detect::{detect_ohlc_columns, ColumnMap};
pub use frame::{Bar, RawTable};
pub use io::RenderedSheet;
