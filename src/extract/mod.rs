pub mod ctd;
pub mod drugbank;
pub mod error;
pub mod line_reader;
pub mod mesh;

pub use self::ctd::{CtdReader, resolve_ctd_path};
pub use self::drugbank::{DrugBankReader, DrugRecord};
pub use self::error::ExtractError;
pub use self::line_reader::{FieldReader, LineReader, open_raw_auto};
pub use self::mesh::{MeshReader, MeshRecord};
