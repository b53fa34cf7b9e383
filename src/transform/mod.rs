pub mod catalog;
pub mod dict_overlay;
pub mod edges;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod relation;
pub mod semtype;
pub mod sources;
pub mod surface_index;

pub use self::catalog::{Catalog, Concept, kg_id_for};
pub use self::dict_overlay::DictOverlay;
pub use self::enrich::{AttachOutcome, try_attach};
pub use self::error::TransformError;
pub use self::normalize::{normalize_surface, slugify};
pub use self::relation::{Predicate, map_ctd_evidence, map_relation, passes_type_gate};
pub use self::semtype::{EntityType, infer_entity_type};
pub use self::sources::SourceTag;
pub use self::surface_index::SurfaceIndex;
