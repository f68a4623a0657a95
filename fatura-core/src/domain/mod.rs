pub mod model;
pub mod status;

pub use model::{compute_totals, Document, DocumentLine, DocumentPatch, DocumentType, Series, SeriesKey, SeriesStatus, Totals};
pub use status::{ensure_valid_transition, is_terminal, ValidationStatus};
