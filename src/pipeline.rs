use crate::config::build_config::BuildConfig;
use crate::error::PipelineError;
use crate::load::writers::write_json_pretty;
use crate::report::manifest::BuildManifest;
use crate::report::stage_report::StageReport;
use crate::stages::{
    BuildContext, CatalogStage, CtdEdgesStage, DictStage, MergeStage, SiderEdgesStage, Stage,
    UmlsEdgesStage, ensure_files,
};
use log::info;
use std::fs;
use validator::Validate;

/// The full build: six stages run strictly in order, each a pure function of
/// files on disk. There is no in-memory handoff between stages — that
/// discipline is what makes the pipeline resumable and byte-stable.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::standard()
    }
}

impl Pipeline {
    /// The declared stage order: catalog, the three per-source edge
    /// builders, the merger, the dictionaries.
    pub fn standard() -> Self {
        Pipeline {
            stages: vec![
                Box::new(CatalogStage),
                Box::new(UmlsEdgesStage),
                Box::new(SiderEdgesStage),
                Box::new(CtdEdgesStage),
                Box::new(MergeStage),
                Box::new(DictStage),
            ],
        }
    }

    /// Runs one stage with its input pre-check and writes its report file.
    pub fn run_stage(
        &self,
        stage: &dyn Stage,
        ctx: &BuildContext,
    ) -> Result<StageReport, PipelineError> {
        let wrap = |source| PipelineError::Stage {
            stage: stage.id(),
            source,
        };
        ensure_files(&stage.required_inputs(ctx)).map_err(wrap)?;
        info!("running stage {}", stage.id());
        let report = stage.run(ctx).map_err(wrap)?;
        write_json_pretty(&ctx.stage_report_path(stage.id()), &report)?;
        Ok(report)
    }

    /// Runs every stage and writes `build_manifest.json` with the ordered
    /// stage reports and a digest of every tracked output.
    pub fn run(&self, ctx: &BuildContext) -> Result<BuildManifest, PipelineError> {
        fs::create_dir_all(&ctx.out_dir).map_err(PipelineError::OutputDir)?;

        let mut reports = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            reports.push(self.run_stage(stage.as_ref(), ctx)?);
        }

        let manifest = BuildManifest::collect(
            &ctx.raw_root,
            &ctx.out_dir,
            &ctx.version,
            reports,
            &ctx.tracked_outputs(),
        )
        .map_err(PipelineError::Manifest)?;
        write_json_pretty(&ctx.build_manifest_path(), &manifest)?;
        info!("build complete: {}", ctx.out_dir.display());
        Ok(manifest)
    }
}

impl TryFrom<BuildConfig> for BuildContext {
    type Error = PipelineError;

    fn try_from(config: BuildConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(BuildContext::from_config(&config))
    }
}

/// Convenience entry point used by the driver binary.
pub fn run_build(config: BuildConfig) -> Result<BuildManifest, PipelineError> {
    let ctx = BuildContext::try_from(config)?;
    Pipeline::standard().run(&ctx)
}
