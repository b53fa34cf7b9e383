pub mod atomic;
pub mod error;
pub mod writers;

pub use self::atomic::AtomicFile;
pub use self::error::LoadError;
pub use self::writers::{
    write_json_pretty, write_jsonl, write_merged_edges_csv, write_source_edges_csv,
};
