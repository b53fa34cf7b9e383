use crate::extract::line_reader::FieldReader;
use crate::load::writers::write_source_edges_csv;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::catalog::Catalog;
use crate::transform::edges::umls::extract_umls_edges;
use std::path::PathBuf;

/// Stage 02: MRREL against the catalog, out to `kg_edges.umls.csv`.
#[derive(Debug, Default)]
pub struct UmlsEdgesStage;

impl Stage for UmlsEdgesStage {
    fn id(&self) -> &'static str {
        "02_build_edges_umls"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![ctx.mrrel(), ctx.entity_catalog()]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&[
            "mrrel_rows",
            "mrrel_short_rows",
            "mapped_relation",
            "filtered_relation",
            "unmapped_cui",
            "filtered_semantic_type",
            "written",
        ]);

        let catalog = Catalog::load_jsonl(&ctx.entity_catalog())?;
        let mut mrrel = FieldReader::rrf(&ctx.mrrel(), ctx.progress_every)?;
        let edges = extract_umls_edges(&mut mrrel, &catalog, &mut counters)?;
        let written = write_source_edges_csv(&ctx.edges_umls(), &edges)?;
        counters.set("written", written);

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("MRREL", ctx.mrrel())
            .input("entity_catalog", ctx.entity_catalog())
            .output("kg_edges_umls", ctx.edges_umls())
            .counts(counters))
    }
}
