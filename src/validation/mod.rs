pub mod dict_overlay;
pub mod error;

pub use self::dict_overlay::{OverlayStats, validate_dict_overlay, validate_files};
pub use self::error::ValidationError;
