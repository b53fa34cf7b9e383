use anyhow::Context;
use biokg::config::{BuildConfig, ConfigLoader};
use biokg::pipeline::run_build;
use std::path::PathBuf;
use std::process::ExitCode;

fn run() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: biokg <config-file>")?;
    let config: BuildConfig =
        ConfigLoader::load(config_path).context("could not load the build configuration")?;
    let manifest = run_build(config)?;
    println!("build complete: {}", manifest.output_dir);
    println!(
        "manifest: {}",
        PathBuf::from(&manifest.output_dir)
            .join("build_manifest.json")
            .display()
    );
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
