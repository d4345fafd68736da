// Adapters layer: concrete record sources behind the `RecordSource` port.

pub mod file;
pub mod memory;

pub use file::{CsvSource, JsonSource};
pub use memory::{sample_payments, StaticSource};
