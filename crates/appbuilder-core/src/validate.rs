//! Structural validation of a [`Configuration`] before generation.
//!
//! Problems are collected, not short-circuited: the wizard shows every
//! message at once.

use std::sync::LazyLock;

use regex::Regex;

use crate::Configuration;
use crate::appid::is_app_id;

/// Maximum length of an app name (a DNS label).
pub const MAX_NAME_LEN: usize = 63;

static APP_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("app name pattern is valid")
});

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    )
    .expect("semver pattern is valid")
});

/// Validate a configuration, returning every problem found in field order.
/// An empty result means the configuration may be handed to the generator.
pub fn validate(config: &Configuration) -> Vec<String> {
    let mut errors = Vec::new();
    let metadata = &config.metadata;

    errors.extend(validate_app_name(&metadata.name));

    if let Some(appid) = metadata.appid.as_deref()
        && !appid.is_empty()
        && !is_app_id(appid)
    {
        errors.push("Appid must be 8 lowercase hex characters".to_owned());
    }

    if metadata.title.trim().is_empty() {
        errors.push("Title is required".to_owned());
    }
    if metadata.description.trim().is_empty() {
        errors.push("Description is required".to_owned());
    }
    if !is_semver(&metadata.version) {
        errors.push("Invalid semantic version format".to_owned());
    }
    if let Some(icon) = metadata.icon.as_deref()
        && !icon.is_empty()
        && !is_valid_url(icon)
    {
        errors.push("Icon must be a valid URL".to_owned());
    }

    if config.docker.repository.trim().is_empty() {
        errors.push("Docker repository is required".to_owned());
    }

    if config.ports.is_empty() {
        errors.push("At least one port must be defined".to_owned());
    }
    for (idx, port) in config.ports.iter().enumerate() {
        let n = idx + 1;
        if port.name.trim().is_empty() {
            errors.push(format!("Port {n}: name is required"));
        }
        if !is_valid_port(port.container_port) {
            errors.push(format!("Port {n}: invalid port number"));
        }
    }

    if config.resources.is_none() {
        errors.push("Resources configuration is required".to_owned());
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), name = %metadata.name, "configuration rejected");
    }
    errors
}

/// Check an app name against the DNS-label rules.
pub fn validate_app_name(name: &str) -> Vec<String> {
    if name.is_empty() {
        return vec!["App name is required".to_owned()];
    }

    let mut errors = Vec::new();
    if !APP_NAME.is_match(name) {
        errors.push(
            "App name must be lowercase alphanumeric with hyphens, and cannot start/end with hyphen"
                .to_owned(),
        );
    }
    if name.len() > MAX_NAME_LEN {
        errors.push(format!("App name must be {MAX_NAME_LEN} characters or less"));
    }
    errors
}

/// Full SemVer 2.0 grammar, including pre-release and build metadata.
pub fn is_semver(version: &str) -> bool {
    SEMVER.is_match(version)
}

pub fn is_valid_port(port: u32) -> bool {
    (1..=65535).contains(&port)
}

/// Whether `value` parses as an absolute URL.
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

/// Check that a document is syntactically valid YAML.
pub fn validate_yaml(content: &str) -> Result<(), String> {
    serde_yaml::from_str::<serde_yaml::Value>(content)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Port, Resources};

    fn valid_config() -> Configuration {
        let mut config = Configuration::default();
        config.metadata.name = "sample-app".to_owned();
        config.metadata.title = "Sample".to_owned();
        config.metadata.description = "A sample".to_owned();
        config.metadata.version = "1.0.0".to_owned();
        config.docker.repository = "nginx".to_owned();
        config.ports.push(Port {
            name: "http".to_owned(),
            container_port: 80,
            protocol: Default::default(),
            kind: Default::default(),
            description: String::new(),
            entrance: None,
        });
        config.resources = Some(Resources::default());
        config
    }

    #[test]
    fn valid_config_has_no_errors() {
        assert!(validate(&valid_config()).is_empty());
    }

    #[test]
    fn empty_config_reports_everything_in_order() {
        let errors = validate(&Configuration::default());
        assert_eq!(
            errors,
            vec![
                "App name is required",
                "Title is required",
                "Description is required",
                "Invalid semantic version format",
                "Docker repository is required",
                "At least one port must be defined",
                "Resources configuration is required",
            ]
        );
    }

    #[test]
    fn port_errors_are_numbered_from_one() {
        let mut config = valid_config();
        config.ports[0].name.clear();
        config.ports[0].container_port = 70000;
        let errors = validate(&config);
        assert_eq!(errors, vec!["Port 1: name is required", "Port 1: invalid port number"]);
    }

    #[test]
    fn icon_must_be_url_when_present() {
        let mut config = valid_config();
        config.metadata.icon = Some("not a url".to_owned());
        assert_eq!(validate(&config), vec!["Icon must be a valid URL"]);

        config.metadata.icon = Some("https://example.com/icon.png".to_owned());
        assert!(validate(&config).is_empty());

        config.metadata.icon = Some(String::new());
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn supplied_appid_must_look_like_one() {
        let mut config = valid_config();
        config.metadata.appid = Some("0badc0de".to_owned());
        assert!(validate(&config).is_empty());

        config.metadata.appid = Some(String::new());
        assert!(validate(&config).is_empty());

        for bad in ["0BADC0DE", "0badc0d", "not-an-id"] {
            config.metadata.appid = Some(bad.to_owned());
            assert_eq!(validate(&config), vec!["Appid must be 8 lowercase hex characters"], "{bad}");
        }
    }

    #[test]
    fn app_name_rules() {
        assert!(validate_app_name("my-app").is_empty());
        assert!(validate_app_name("a").is_empty());
        assert_eq!(validate_app_name("-bad").len(), 1);
        assert_eq!(validate_app_name("bad-").len(), 1);
        assert_eq!(validate_app_name("Bad").len(), 1);
        assert_eq!(validate_app_name(&"a".repeat(63)).len(), 0);
        let errors = validate_app_name(&"a".repeat(64));
        assert_eq!(errors, vec!["App name must be 63 characters or less"]);
    }

    #[test]
    fn semver_rules() {
        for ok in ["1.0.0", "0.1.0", "10.20.30", "1.0.0-alpha.1", "1.0.0+build.5", "1.0.0-rc.1+sha.abc"] {
            assert!(is_semver(ok), "{ok} should be semver");
        }
        for bad in ["", "1", "1.0", "01.0.0", "1.0.0-", "v1.0.0"] {
            assert!(!is_semver(bad), "{bad} should not be semver");
        }
    }

    #[test]
    fn port_range() {
        assert!(!is_valid_port(0));
        assert!(is_valid_port(1));
        assert!(is_valid_port(65535));
        assert!(!is_valid_port(65536));
    }

    #[test]
    fn yaml_syntax() {
        assert!(validate_yaml("a: 1\nb: [1, 2]\n").is_ok());
        assert!(validate_yaml("a: [1, 2\n").is_err());
    }
}
