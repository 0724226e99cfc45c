use std::path::Path;

use appbuilder_core::Configuration;

pub fn validate(configuration: &Path) -> anyhow::Result<()> {
    let config = Configuration::load(configuration)?;
    let errors = appbuilder_core::validate(&config);

    if errors.is_empty() {
        println!("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        eprintln!("  - {error}");
    }
    anyhow::bail!("configuration has {} error(s)", errors.len());
}
