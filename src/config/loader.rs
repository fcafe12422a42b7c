use ignore::overrides::{Override, OverrideBuilder};
use miette::{IntoDiagnostic, Result, WrapErr};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for a hiltlint run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target directories to analyze
    pub targets: Vec<PathBuf>,

    /// Patterns to exclude from analysis
    pub exclude: Vec<String>,

    /// Report configuration
    pub report: ReportConfig,

    /// Hilt rule configuration
    pub hilt: HiltConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json, sarif
    pub format: String,
}

/// Names the rule matches against. Defaults are the Hilt and AndroidX names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HiltConfig {
    /// Marker placed on Android components that Hilt can inject
    pub entry_point_annotation: String,

    /// Marker placed on declarations that may only be used from an entry point
    pub requires_entry_point_annotation: String,

    /// Marker placed on injectable view models
    pub view_model_annotation: String,

    /// Generic factory functions that create a view model from a type argument
    pub view_model_factories: Vec<String>,

    /// Whether the project generates view binding classes.
    /// `None` means "detect from the Gradle build files".
    pub view_binding: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/build/**".to_string(),
                "**/generated/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            report: ReportConfig::default(),
            hilt: HiltConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
        }
    }
}

impl Default for HiltConfig {
    fn default() -> Self {
        Self {
            entry_point_annotation: "dagger.hilt.android.AndroidEntryPoint".to_string(),
            requires_entry_point_annotation: "com.jaychang.hiltlint.RequiresAndroidEntryPoint"
                .to_string(),
            view_model_annotation: "dagger.hilt.android.lifecycle.HiltViewModel".to_string(),
            view_model_factories: vec!["viewModels".to_string()],
            view_binding: None,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".hiltlint.yml",
            ".hiltlint.yaml",
            ".hiltlint.toml",
            "hiltlint.yml",
            "hiltlint.yaml",
            "hiltlint.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Exclude patterns as gitignore-style globs matched relative to `root`
    pub fn exclude_overrides(&self, root: &Path) -> Result<Override> {
        let mut builder = OverrideBuilder::new(root);
        for pattern in &self.exclude {
            // Override globs whitelist by default; `!` turns them into excludes
            builder
                .add(&format!("!{}", pattern))
                .into_diagnostic()
                .wrap_err_with(|| format!("Invalid exclude pattern: {}", pattern))?;
        }
        builder
            .build()
            .into_diagnostic()
            .wrap_err("Failed to build exclude patterns")
    }

    /// Resolve the "uses view binding" project flag.
    ///
    /// An explicit `hilt.view_binding` wins; otherwise every Gradle build
    /// script under the project root is scanned for `viewBinding true`,
    /// `viewBinding = true` or `viewBinding.enabled = true`.
    pub fn uses_view_binding(&self, project_root: &Path) -> Result<bool> {
        if let Some(explicit) = self.hilt.view_binding {
            return Ok(explicit);
        }

        let pattern = Regex::new(r"viewBinding(?:\.enabled)?\s*=?\s*true").into_diagnostic()?;
        let excludes = self.exclude_overrides(project_root)?;

        let enabled = walkdir::WalkDir::new(project_root)
            .into_iter()
            .filter_entry(|e| !excludes.matched(e.path(), e.file_type().is_dir()).is_ignore())
            .filter_map(|e| e.ok())
            .filter(|e| {
                let name = e.file_name().to_string_lossy();
                name == "build.gradle" || name == "build.gradle.kts"
            })
            .filter_map(|e| std::fs::read_to_string(e.path()).ok())
            .any(|contents| pattern.is_match(&contents));

        debug!("View binding detected from build files: {}", enabled);
        Ok(enabled)
    }
}
