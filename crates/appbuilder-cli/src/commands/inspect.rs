use std::path::Path;

use appbuilder_core::Settings;
use appbuilder_inspect::RepoInspector;

pub async fn inspect(settings_path: &Path, url: &str, branch: Option<&str>) -> anyhow::Result<()> {
    let settings = Settings::load_with_env(settings_path)?;
    let inspector = RepoInspector::from_settings(&settings.github)?;

    let analysis = inspector.analyze(url, branch).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
