use crate::extract::line_reader::FieldReader;
use crate::load::writers::write_json_pretty;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::catalog::Catalog;
use crate::transform::dict_overlay::build_dicts;
use crate::validation::dict_overlay::validate_dict_overlay;
use log::info;
use std::path::PathBuf;

/// Stage 06: the two-tier synonym dictionary. Writes the base dict to
/// `umls_dict.txt` (JSON content; the name is fixed by downstream
/// consumers) and the overlay to `umls_dict.overlay.json`, failing the
/// build when the overlay violates the schema contract.
#[derive(Debug, Default)]
pub struct DictStage;

impl Stage for DictStage {
    fn id(&self) -> &'static str {
        "06_build_umls_dict_and_overlay"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![ctx.entity_catalog(), ctx.mrconso()]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&[
            "entities_rows_seen",
            "entities_with_cui",
            "mrconso_rows_seen",
            "mrconso_short_rows",
            "mrconso_english_rows_mapped",
            "total_base_synonyms",
            "total_overlay_synonyms",
            "overlay_keys",
        ]);

        let catalog = Catalog::load_jsonl(&ctx.entity_catalog())?;
        counters.set("entities_rows_seen", catalog.len() as u64);

        let mut mrconso = FieldReader::rrf(&ctx.mrconso(), ctx.progress_every)?;
        let dicts = build_dicts(&catalog, &mut mrconso, &mut counters)?;

        let stats =
            validate_dict_overlay(&dicts.base, &dicts.overlay, ctx.allow_overlay_new_keys)?;
        info!(
            "dictionary validated: {} base keys, {} overlay keys",
            stats.dict_keys, stats.overlay_keys
        );

        write_json_pretty(&ctx.umls_dict(), &dicts.base)?;
        write_json_pretty(&ctx.umls_dict_overlay(), &dicts.overlay)?;

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("entity_catalog", ctx.entity_catalog())
            .input("mrconso", ctx.mrconso())
            .output("umls_dict", ctx.umls_dict())
            .output("umls_dict_overlay", ctx.umls_dict_overlay())
            .counts(counters))
    }
}
