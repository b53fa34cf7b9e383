use crate::extract::drugbank::DrugBankReader;
use crate::extract::line_reader::FieldReader;
use crate::extract::mesh::MeshReader;
use crate::report::stage_report::{Counters, StageReport};
use crate::stages::error::StageError;
use crate::stages::{BuildContext, Stage};
use crate::transform::catalog::{Catalog, UpsertOutcome};
use crate::transform::enrich::{enrich_from_drugbank, enrich_from_mesh, enrich_from_rxnorm};
use crate::transform::semtype::{EntityType, infer_entity_type};
use crate::transform::surface_index::SurfaceIndex;
use log::info;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

/// Stage 01: joins MRSTY and MRCONSO into the typed entity catalog, then
/// enriches it with RxNorm, DrugBank and MeSH names under the single-target
/// rule, and writes `entity_catalog.jsonl`.
#[derive(Debug, Default)]
pub struct CatalogStage;

impl Stage for CatalogStage {
    fn id(&self) -> &'static str {
        "01_build_entity_catalog"
    }

    fn required_inputs(&self, ctx: &BuildContext) -> Vec<PathBuf> {
        vec![
            ctx.mrconso(),
            ctx.mrsty(),
            ctx.rxnconso(),
            ctx.mesh_xml(),
            ctx.drugbank_xml(),
        ]
    }

    fn run(&self, ctx: &BuildContext) -> Result<StageReport, StageError> {
        let mut counters = Counters::preset(&[
            "mrsty_rows",
            "mrsty_short_rows",
            "mrconso_rows",
            "mrconso_short_rows",
            "mrconso_empty_rows",
            "filtered_non_english",
            "dropped_other_type",
            "kg_id_collisions",
            "rxnorm_rows",
            "rxnorm_short_rows",
            "rxnorm_synonyms_added",
            "rxnorm_ambiguous_rejected",
            "drugbank_synonyms_added",
            "drugbank_ambiguous_rejected",
            "mesh_synonyms_added",
            "mesh_ambiguous_rejected",
            "entities_written",
        ]);

        // Pass A: TUI sets per CUI.
        let mut cui_tuis: HashMap<String, BTreeSet<String>> = HashMap::new();
        let mut mrsty = FieldReader::rrf(&ctx.mrsty(), ctx.progress_every)?;
        while let Some(fields) = mrsty.next_row()? {
            counters.bump("mrsty_rows");
            if fields.len() < 4 {
                counters.bump("mrsty_short_rows");
                continue;
            }
            let cui = fields[0].trim().to_uppercase();
            let tui = fields[1].trim().to_uppercase();
            if !cui.is_empty() && !tui.is_empty() {
                cui_tuis.entry(cui).or_default().insert(tui);
            }
        }
        info!("classified TUI sets for {} CUIs", cui_tuis.len());

        // Pass B: fold English surfaces into typed concepts.
        let empty_tuis = BTreeSet::new();
        let mut catalog = Catalog::new();
        let mut mrconso = FieldReader::rrf(&ctx.mrconso(), ctx.progress_every)?;
        while let Some(fields) = mrconso.next_row()? {
            counters.bump("mrconso_rows");
            if fields.len() < 15 {
                counters.bump("mrconso_short_rows");
                continue;
            }
            let cui = fields[0].trim().to_uppercase();
            let lat = fields[1].trim().to_uppercase();
            let is_pref = fields[6].trim().eq_ignore_ascii_case("Y");
            let text = fields[14].trim();
            if cui.is_empty() || text.is_empty() {
                counters.bump("mrconso_empty_rows");
                continue;
            }
            if lat != "ENG" {
                counters.bump("filtered_non_english");
                continue;
            }
            let entity_type =
                infer_entity_type(cui_tuis.get(&cui).unwrap_or(&empty_tuis));
            if entity_type == EntityType::Other {
                counters.bump("dropped_other_type");
                continue;
            }
            if catalog.observe_umls_surface(&cui, text, is_pref, entity_type)
                == UpsertOutcome::CreatedWithFallbackId
            {
                counters.bump("kg_id_collisions");
            }
        }
        info!("catalog holds {} concepts before enrichment", catalog.len());

        // The index is frozen here: names attached below never become anchors.
        let index = SurfaceIndex::from_catalog(&catalog);

        let mut rxnorm = FieldReader::rrf(&ctx.rxnconso(), ctx.progress_every)?;
        enrich_from_rxnorm(&mut catalog, &index, &mut rxnorm, &mut counters)?;

        let mut drugbank = DrugBankReader::open(&ctx.drugbank_xml())?;
        enrich_from_drugbank(&mut catalog, &index, &mut drugbank, &mut counters)?;

        let mut mesh = MeshReader::open(&ctx.mesh_xml())?;
        enrich_from_mesh(&mut catalog, &index, &mut mesh, &mut counters)?;

        let written = catalog.write_jsonl(&ctx.entity_catalog())?;
        counters.set("entities_written", written);

        Ok(StageReport::new(self.id(), &ctx.version)
            .input("MRCONSO", ctx.mrconso())
            .input("MRSTY", ctx.mrsty())
            .input("RXNCONSO", ctx.rxnconso())
            .input("MeSH_XML", ctx.mesh_xml())
            .input("DrugBank_XML", ctx.drugbank_xml())
            .output("entity_catalog", ctx.entity_catalog())
            .counts(counters))
    }
}
