use crate::extract::line_reader::FieldReader;
use crate::load::writers::write_source_edges_csv;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::catalog::Catalog;
use crate::transform::edges::sider::{extract_sider_edges, load_stitch_names};
use std::path::PathBuf;

/// Stage 03: SIDER side effects (STITCH → drug name → surface) against the
/// catalog, out to `kg_edges.sider.csv`.
#[derive(Debug, Default)]
pub struct SiderEdgesStage;

impl Stage for SiderEdgesStage {
    fn id(&self) -> &'static str {
        "03_build_edges_sider"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![
            ctx.sider_drug_names(),
            ctx.sider_meddra(),
            ctx.entity_catalog(),
        ]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&[
            "drug_names_rows",
            "drug_names_short_rows",
            "meddra_rows",
            "meddra_short_rows",
            "unmapped_drug",
            "unmapped_effect",
            "written",
        ]);

        let catalog = Catalog::load_jsonl(&ctx.entity_catalog())?;
        let mut drug_names = FieldReader::tsv(&ctx.sider_drug_names(), ctx.progress_every)?;
        let stitch_names = load_stitch_names(&mut drug_names, &mut counters)?;
        let mut meddra = FieldReader::tsv(&ctx.sider_meddra(), ctx.progress_every)?;
        let edges = extract_sider_edges(&mut meddra, &stitch_names, &catalog, &mut counters)?;
        let written = write_source_edges_csv(&ctx.edges_sider(), &edges)?;
        counters.set("written", written);

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("drug_names", ctx.sider_drug_names())
            .input("meddra_all_se", ctx.sider_meddra())
            .input("entity_catalog", ctx.entity_catalog())
            .output("kg_edges_sider", ctx.edges_sider())
            .counts(counters))
    }
}
