pub mod json_file;
pub mod memory;
pub mod merge;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::RecordStore;
