//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::path::Path;

/// Name of the configuration file at the project root.
pub const CONFIG_FILE_NAME: &str = "tycheck.toml";

/// Loads and validates `tycheck.toml` from a project directory.
///
/// A missing file is not an error: the project gets the default
/// configuration. Any other read failure, a parse failure, or a validation
/// failure is returned to the caller.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    match std::fs::read_to_string(&config_path) {
        Ok(content) => load_config_from_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let config = ProjectConfig::default();
            validate_config(&config)?;
            Ok(config)
        }
        Err(e) => Err(ConfigError::IoError(e)),
    }
}

/// Parses and validates a `tycheck.toml` configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.include.is_empty() {
        return Err(ConfigError::MissingField("project.include".to_string()));
    }
    for dir in &config.project.include {
        if Path::new(dir).is_absolute() {
            return Err(ConfigError::ValidationError(format!(
                "include directory '{dir}' must be relative to the project root"
            )));
        }
    }
    for (pattern, targets) in &config.paths {
        if pattern.matches('*').count() > 1 {
            return Err(ConfigError::ValidationError(format!(
                "path pattern '{pattern}' can have at most one '*'"
            )));
        }
        if targets.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "path pattern '{pattern}' has no targets"
            )));
        }
        if let Some(target) = targets.iter().find(|t| t.matches('*').count() > 1) {
            return Err(ConfigError::ValidationError(format!(
                "path target '{target}' can have at most one '*'"
            )));
        }
    }
    if config.diagnostics.internal_alias.is_empty() {
        return Err(ConfigError::MissingField(
            "diagnostics.internal_alias".to_string(),
        ));
    }
    if Path::new(&config.diagnostics.internal_dir).is_absolute() {
        return Err(ConfigError::ValidationError(
            "diagnostics.internal_dir must be relative to the project root".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.project.include, vec!["src"]);
        assert!(config.compiler.check_packages);
        assert!(!config.compiler.allow_js);
        assert_eq!(config.paths["@/*"], vec!["src/*"]);
        assert_eq!(config.diagnostics.internal_dir, "src/__internal__");
        assert_eq!(config.diagnostics.internal_alias, "@internal");
        assert_eq!(config.diagnostics.ignore_messages, vec!["index.css"]);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.dir, ".tycheck");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[project]
include = ["src", "shared"]
exclude = ["node_modules"]

[compiler]
check_packages = false
allow_js = true
ambient_modules = ["*.css"]

[paths]
"@/*" = ["src/*"]
"~lib" = ["shared/lib/index.ts"]

[diagnostics]
internal_dir = "src/__zite__"
internal_alias = "@zite"
ignore_messages = ["index.css", "shadows.css"]

[cache]
enabled = false
dir = "build/.cache"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.project.include, vec!["src", "shared"]);
        assert!(!config.compiler.check_packages);
        assert!(config.compiler.allow_js);
        assert_eq!(config.compiler.ambient_modules, vec!["*.css"]);
        assert_eq!(config.paths.len(), 2);
        assert_eq!(config.paths["~lib"], vec!["shared/lib/index.ts"]);
        assert_eq!(config.diagnostics.internal_alias, "@zite");
        assert_eq!(config.diagnostics.ignore_messages.len(), 2);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[compiler]\ncheck_packages = false\n").unwrap();
        assert!(!config.compiler.check_packages);
        assert!(config.compiler.ambient_modules.iter().any(|m| m == "*.css"));
    }

    #[test]
    fn empty_include_errors() {
        let err = load_config_from_str("[project]\ninclude = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn double_wildcard_errors() {
        let err = load_config_from_str("[paths]\n\"@/*/*\" = [\"src/*\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_targets_error() {
        let err = load_config_from_str("[paths]\n\"@/*\" = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_type_errors() {
        let err = load_config_from_str("[compiler]\ncheck_packages = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.project.include, vec!["src"]);
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[diagnostics]\nignore_messages = []\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(config.diagnostics.ignore_messages.is_empty());
    }
}
