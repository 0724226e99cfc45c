use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use appbuilder_chart::{ChartBuilder, TemplateStore, archive_file_name, write_chart};
use appbuilder_core::{Configuration, Settings};

fn chart_builder(settings_path: &Path) -> anyhow::Result<ChartBuilder> {
    let settings = Settings::load_with_env(settings_path)?;
    let store = TemplateStore::load(settings.templates.dir.as_deref())
        .context("failed to load chart templates")?;
    Ok(ChartBuilder::new(Arc::new(store)))
}

fn load_valid(configuration: &Path) -> anyhow::Result<Configuration> {
    let config = Configuration::load(configuration)?;
    config.ensure_valid()?;
    Ok(config)
}

pub fn generate(settings_path: &Path, configuration: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let config = load_valid(configuration)?;
    let chart = chart_builder(settings_path)?.generate(&config)?;
    let chart_dir = write_chart(&chart.files, &chart.config, out_dir)?;

    println!("Generated chart at {}", chart_dir.display());
    println!("  appid: {}", chart.appid());
    Ok(())
}

pub fn package(
    settings_path: &Path,
    configuration: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_valid(configuration)?;
    let (chart, archive) = chart_builder(settings_path)?.build(&config)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(archive_file_name(&chart.config)));
    std::fs::write(&output, &archive)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("Packaged {} ({} bytes)", output.display(), archive.len());
    println!("  appid: {}", chart.appid());
    Ok(())
}
