//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".checksort/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: SortRules,
    #[serde(default)]
    pub watch: Watch,
    #[serde(default)]
    pub policy: Policy,
}

/// The matcher tables consumed by the reorder engine. Table order is
/// significant: it defines both membership short-circuiting and sort rank.
/// The engine never mutates these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRules {
    #[serde(default = "SortRules::default_statuses")]
    pub statuses: Vec<String>,
    #[serde(default = "SortRules::default_sorted_statuses")]
    pub sorted_statuses: Vec<String>,
    #[serde(default = "SortRules::default_sorted_substrings")]
    pub sorted_substrings: Vec<String>,
    #[serde(default = "SortRules::default_ignore_substrings")]
    pub ignore_substrings: Vec<String>,
}

impl SortRules {
    fn default_statuses() -> Vec<String> {
        ["- [ ]", "- [/]", "- [x]", "- [-]", "- [>]", "- [<]"]
            .map(str::to_owned)
            .to_vec()
    }

    fn default_sorted_statuses() -> Vec<String> {
        ["- [x]", "- [-]"].map(str::to_owned).to_vec()
    }

    fn default_sorted_substrings() -> Vec<String> {
        ["🔺", "⏫", "🔽", "⏬"].map(str::to_owned).to_vec()
    }

    fn default_ignore_substrings() -> Vec<String> {
        vec!["#donotsort".to_owned()]
    }
}

impl Default for SortRules {
    fn default() -> Self {
        Self {
            statuses: Self::default_statuses(),
            sorted_statuses: Self::default_sorted_statuses(),
            sorted_substrings: Self::default_sorted_substrings(),
            ignore_substrings: Self::default_ignore_substrings(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watch {
    #[serde(default = "Watch::default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Watch {
    fn default_interval_seconds() -> u64 {
        5
    }
}

impl Default for Watch {
    fn default() -> Self {
        Self {
            interval_seconds: Self::default_interval_seconds(),
        }
    }
}

/// Per-document opt-in/opt-out glob lists, consulted by the host before
/// the engine runs at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Policy {
    #[serde(default)]
    pub enable: Vec<String>,
    #[serde(default)]
    pub disable: Vec<String>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    interval_seconds: Option<u64>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            interval_seconds: env::var("CHECKSORT_INTERVAL_SECONDS")
                .ok()
                .and_then(|value| value.parse().ok()),
        }
    }

    #[cfg(test)]
    fn for_tests(interval_seconds: u64) -> Self {
        Self {
            interval_seconds: Some(interval_seconds),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace
    /// config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Persist the configuration to `path`, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create config directory {}", dir.display()))?;
        }
        let data = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, data)
            .with_context(|| format!("failed to write config file to {}", path.display()))?;
        Ok(())
    }

    fn merge(self, other: Self) -> Self {
        Self {
            rules: merge_rules(self.rules, other.rules),
            watch: merge_watch(self.watch, other.watch),
            policy: merge_policy(self.policy, other.policy),
        }
    }
}

fn merge_rules(base: SortRules, overlay: SortRules) -> SortRules {
    SortRules {
        statuses: choose_table(base.statuses, overlay.statuses, SortRules::default_statuses),
        sorted_statuses: choose_table(
            base.sorted_statuses,
            overlay.sorted_statuses,
            SortRules::default_sorted_statuses,
        ),
        sorted_substrings: choose_table(
            base.sorted_substrings,
            overlay.sorted_substrings,
            SortRules::default_sorted_substrings,
        ),
        ignore_substrings: choose_table(
            base.ignore_substrings,
            overlay.ignore_substrings,
            SortRules::default_ignore_substrings,
        ),
    }
}

// Tables are ordered, so overlays replace wholesale instead of merging
// entry sets.
fn choose_table(
    base: Vec<String>,
    overlay: Vec<String>,
    default_fn: fn() -> Vec<String>,
) -> Vec<String> {
    if overlay != default_fn() { overlay } else { base }
}

fn merge_watch(base: Watch, overlay: Watch) -> Watch {
    Watch {
        interval_seconds: if overlay.interval_seconds != Watch::default_interval_seconds() {
            overlay.interval_seconds
        } else {
            base.interval_seconds
        },
    }
}

fn merge_policy(base: Policy, overlay: Policy) -> Policy {
    Policy {
        enable: append_unique(base.enable, overlay.enable),
        disable: append_unique(base.disable, overlay.disable),
    }
}

fn append_unique(mut base: Vec<String>, overlay: Vec<String>) -> Vec<String> {
    for entry in overlay {
        if !base.contains(&entry) {
            base.push(entry);
        }
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("checksort/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(interval) = env.interval_seconds {
        config.watch.interval_seconds = interval;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.rules.statuses.len(), 6);
        assert_eq!(config.rules.sorted_statuses, vec!["- [x]", "- [-]"]);
        assert_eq!(config.rules.ignore_substrings, vec!["#donotsort"]);
        assert_eq!(config.watch.interval_seconds, 5);
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[rules]
sorted_statuses = ["- [-]", "- [x]"]
[policy]
disable = ["journal/**"]
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".checksort"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".checksort/config.toml"),
            r#"
[watch]
interval_seconds = 30
[policy]
disable = ["scratch.md"]
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".checksort/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.rules.sorted_statuses, vec!["- [-]", "- [x]"]);
        assert_eq!(config.watch.interval_seconds, 30);
        assert!(config.policy.disable.contains(&"journal/**".into()));
        assert!(config.policy.disable.contains(&"scratch.md".into()));

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests(120);
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.watch.interval_seconds, 120);
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested/config.toml");

        let mut config = Config::default();
        config.rules.ignore_substrings.push("#keep".into());
        config.watch.interval_seconds = 9;
        config.save_to(&path)?;

        let loaded = Config::from_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn malformed_list_entries_survive_loading() {
        let config = Config::from_str(
            r##"
[rules]
ignore_substrings = ["", "  ", "#keep"]
"##,
        )
        .expect("parse");
        // Empty entries stay in the table; matching skips them.
        assert_eq!(config.rules.ignore_substrings.len(), 3);
    }
}
