use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::render::Strategy;

/// Persistent defaults loaded from rc files and merged with CLI flags.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub watch: bool,
    pub fix: bool,
    pub strategy: Option<Strategy>,
    pub nodes_per_page: Option<usize>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            watch: self.watch || other.watch,
            fix: self.fix || other.fix,
            strategy: other.strategy.or(self.strategy),
            nodes_per_page: other.nodes_per_page.or(self.nodes_per_page),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markwell").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markwell")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markwell").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markwell")
                .join("config");
        }
    }

    PathBuf::from(".markwellrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markwellrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# markwell defaults (saved with --save)".to_string());
    if flags.watch {
        lines.push("--watch".to_string());
    }
    if flags.fix {
        lines.push("--fix".to_string());
    }
    if let Some(strategy) = flags.strategy {
        let strategy_str = match strategy {
            Strategy::Neighbor => "neighbor",
            Strategy::Monotonic => "monotonic",
        };
        lines.push(format!("--strategy {strategy_str}"));
    }
    if let Some(n) = flags.nodes_per_page {
        lines.push(format!("--nodes-per-page {n}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--watch" {
            flags.watch = true;
        } else if token == "--fix" {
            flags.fix = true;
        } else if token == "--strategy" {
            if let Some(next) = tokens.get(i + 1) {
                flags.strategy = parse_strategy(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--strategy=") {
            flags.strategy = parse_strategy(value);
        } else if token == "--nodes-per-page" {
            if let Some(next) = tokens.get(i + 1) {
                flags.nodes_per_page = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--nodes-per-page=") {
            flags.nodes_per_page = value.parse().ok();
        }
        i += 1;
    }
    flags
}

fn parse_strategy(s: &str) -> Option<Strategy> {
    match s {
        "neighbor" => Some(Strategy::Neighbor),
        "monotonic" => Some(Strategy::Monotonic),
        _ => None,
    }
}
