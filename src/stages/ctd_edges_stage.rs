use crate::extract::ctd::CtdReader;
use crate::load::writers::write_source_edges_csv;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::catalog::Catalog;
use crate::transform::edges::ctd::extract_ctd_edges;
use std::path::PathBuf;

/// Stage 04: CTD chemical–disease rows against the catalog, out to
/// `kg_edges.ctd.csv`.
#[derive(Debug, Default)]
pub struct CtdEdgesStage;

impl Stage for CtdEdgesStage {
    fn id(&self) -> &'static str {
        "04_build_edges_ctd"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![ctx.ctd_chemicals_diseases(), ctx.entity_catalog()]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&[
            "ctd_rows",
            "ctd_short_rows",
            "unmapped_chemical",
            "unmapped_disease",
            "written",
        ]);

        let catalog = Catalog::load_jsonl(&ctx.entity_catalog())?;
        let mut ctd = CtdReader::open(&ctx.ctd_chemicals_diseases(), ctx.progress_every)?;
        let edges = extract_ctd_edges(&mut ctd, &catalog, &mut counters)?;
        let written = write_source_edges_csv(&ctx.edges_ctd(), &edges)?;
        counters.set("written", written);

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("ctd_chemicals_diseases", ctx.ctd_chemicals_diseases())
            .input("entity_catalog", ctx.entity_catalog())
            .output("kg_edges_ctd", ctx.edges_ctd())
            .counts(counters))
    }
}
