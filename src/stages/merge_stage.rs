use crate::load::writers::write_merged_edges_csv;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::edges::merge::EdgeMerger;
use std::path::PathBuf;

/// Stage 05: fuses the three per-source edge files by `(head, relation,
/// tail)` — provenance unioned, best score kept — into
/// `kg_edges.merged.csv` and its byte-identical `.plus` twin.
#[derive(Debug, Default)]
pub struct MergeStage;

impl Stage for MergeStage {
    fn id(&self) -> &'static str {
        "05_merge_edges"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![ctx.edges_umls(), ctx.edges_sider(), ctx.edges_ctd()]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&["rows_seen", "rows_written"]);

        let mut merger = EdgeMerger::new();
        for path in [ctx.edges_umls(), ctx.edges_sider(), ctx.edges_ctd()] {
            let rows = merger.absorb_file(&path)?;
            counters.add("rows_seen", rows);
        }
        let merged = merger.into_sorted_edges();

        // Downstream consumers expect both paths with identical bytes.
        let written = write_merged_edges_csv(&ctx.edges_merged(), &merged)?;
        write_merged_edges_csv(&ctx.edges_merged_plus(), &merged)?;
        counters.set("rows_written", written);

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("umls", ctx.edges_umls())
            .input("sider", ctx.edges_sider())
            .input("ctd", ctx.edges_ctd())
            .output("kg_edges_merged", ctx.edges_merged())
            .output("kg_edges_merged_plus", ctx.edges_merged_plus())
            .counts(counters))
    }
}
