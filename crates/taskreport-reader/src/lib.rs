pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::ReaderError;
pub use model::{render_datetime, render_float, CellText, SourceFormat};
pub use registry::{read_upload, read_with_readers, TableReader};
