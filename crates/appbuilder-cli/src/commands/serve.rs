use std::path::Path;

use appbuilder_core::Settings;

pub async fn serve(settings_path: &Path) -> anyhow::Result<()> {
    let settings = Settings::load_with_env(settings_path)?;
    appbuilder::serve(settings).await?;
    Ok(())
}
