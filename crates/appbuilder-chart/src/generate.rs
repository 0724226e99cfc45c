//! Configuration → File-Set.

use std::sync::Arc;

use appbuilder_core::Configuration;
use appbuilder_core::validate::validate_yaml;
use minijinja::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::package::{self, PackageError};
use crate::render::{self, TemplateError};
use crate::store::TemplateStore;

/// Rendered chart files keyed by output path, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    files: Vec<(&'static str, String)>,
}

impl FileSet {
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, content)| content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.files.iter().map(|(p, _)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.files.iter().map(|(p, c)| (*p, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(&'static str, String)> for FileSet {
    fn from_iter<I: IntoIterator<Item = (&'static str, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Serialized as a `{path: content}` object in registry order.
impl Serialize for FileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.files.len()))?;
        for (path, content) in &self.files {
            map.serialize_entry(path, content)?;
        }
        map.end()
    }
}

/// The defaulted configuration and the files rendered from it.
#[derive(Debug, Clone)]
pub struct GeneratedChart {
    pub config: Configuration,
    pub files: FileSet,
}

impl GeneratedChart {
    /// The appid the chart was rendered with.
    pub fn appid(&self) -> &str {
        self.config.metadata.appid.as_deref().unwrap_or_default()
    }

    /// Syntax errors in the top-level YAML documents, as `"<path>: <error>"`.
    ///
    /// Files under `templates/` carry Helm expressions and are not plain YAML.
    pub fn yaml_errors(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|(path, _)| path.ends_with(".yaml") && !path.contains('/'))
            .filter_map(|(path, content)| {
                validate_yaml(content)
                    .err()
                    .map(|e| format!("{path}: {e}"))
            })
            .collect()
    }
}

/// Renders charts from a shared [`TemplateStore`] and packages them.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    store: Arc<TemplateStore>,
}

impl ChartBuilder {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Default a copy of `config` and render every registry template.
    ///
    /// The caller's configuration is not modified. Any render failure aborts
    /// the whole generation; no partial set is returned.
    pub fn generate(&self, config: &Configuration) -> Result<GeneratedChart, GenerateError> {
        let config = config.with_defaults();
        let context = Value::from_serialize(&config);

        let files = self
            .store
            .iter()
            .map(|template| {
                render::render(template.path, &template.source, &context)
                    .map(|content| (template.path, content))
                    .map_err(|e| GenerateError::Render {
                        path: template.path.to_owned(),
                        source: e,
                    })
            })
            .collect::<Result<FileSet, GenerateError>>()?;

        tracing::debug!(
            name = %config.metadata.name,
            appid = config.metadata.appid.as_deref().unwrap_or_default(),
            files = files.len(),
            "generated chart files"
        );
        Ok(GeneratedChart { config, files })
    }

    /// Archive a generated chart.
    pub fn package(&self, chart: &GeneratedChart) -> Result<Vec<u8>, PackageError> {
        package::package(&chart.files, &chart.config)
    }

    /// Generate and package in one step.
    pub fn build(&self, config: &Configuration) -> Result<(GeneratedChart, Vec<u8>), BuildError> {
        let chart = self.generate(config)?;
        let archive = self.package(&chart)?;
        Ok((chart, archive))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("failed to render {path}")]
    Render {
        path: String,
        source: TemplateError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Package(#[from] PackageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::REGISTRY;

    fn builder() -> ChartBuilder {
        ChartBuilder::new(Arc::new(TemplateStore::embedded().unwrap()))
    }

    #[test]
    fn file_set_keeps_registry_order() {
        let chart = builder().generate(&Configuration::default()).unwrap();
        let paths: Vec<_> = chart.files.paths().collect();
        assert_eq!(paths, REGISTRY);
    }

    #[test]
    fn generate_does_not_touch_input() {
        let mut config = Configuration::default();
        config.metadata.name = "my-app".to_owned();
        let chart = builder().generate(&config).unwrap();

        assert!(config.metadata.appid.is_none());
        assert_eq!(chart.appid(), appbuilder_core::derive_app_id("my-app"));
    }

    #[test]
    fn rendered_top_level_yaml_parses() {
        let chart = builder().generate(&Configuration::default()).unwrap();
        assert!(chart.yaml_errors().is_empty(), "{:?}", chart.yaml_errors());
    }

    #[test]
    fn yaml_errors_name_the_file() {
        let mut chart = builder().generate(&Configuration::default()).unwrap();
        chart.files = [
            ("Chart.yaml", "name: [unclosed\n".to_owned()),
            ("templates/service.yaml", "{{ .Values }}: [\n".to_owned()),
            ("README.md", "- [\n".to_owned()),
        ]
        .into_iter()
        .collect();

        let errors = chart.yaml_errors();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].starts_with("Chart.yaml: "), "{errors:?}");
    }

    #[test]
    fn serializes_as_ordered_object() {
        let files: FileSet = [("b.yaml", "1".to_owned()), ("a.yaml", "2".to_owned())]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&files).unwrap();
        assert_eq!(json, r#"{"b.yaml":"1","a.yaml":"2"}"#);
    }
}
