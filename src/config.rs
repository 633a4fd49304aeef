use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChoice {
    Edit,
    Split,
    Preview,
}

impl ViewChoice {
    pub const fn into_view_mode(self) -> crate::app::ViewMode {
        match self {
            Self::Edit => crate::app::ViewMode::Edit,
            Self::Split => crate::app::ViewMode::Split,
            Self::Preview => crate::app::ViewMode::Preview,
        }
    }
}

/// Flags that can be persisted as defaults and merged with the CLI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_autosave: bool,
    pub autosave_ms: Option<u64>,
    pub view: Option<ViewChoice>,
    pub theme: Option<ThemeMode>,
    pub storage_dir: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge, with `other` (typically the CLI) winning for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_autosave: self.no_autosave || other.no_autosave,
            autosave_ms: other.autosave_ms.or(self.autosave_ms),
            view: other.view.or(self.view),
            theme: other.theme.or(self.theme),
            storage_dir: other
                .storage_dir
                .clone()
                .or_else(|| self.storage_dir.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markpad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markpad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markpad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markpad")
                .join("config");
        }
    }

    PathBuf::from(".markpadrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markpadrc")
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
    lines.push("# markpad defaults (saved with --save)".to_string());
    if flags.no_autosave {
        lines.push("--no-autosave".to_string());
    }
    if let Some(ms) = flags.autosave_ms {
        lines.push(format!("--autosave-ms {ms}"));
    }
    if let Some(view) = flags.view {
        let view_str = match view {
            ViewChoice::Edit => "edit",
            ViewChoice::Split => "split",
            ViewChoice::Preview => "preview",
        };
        lines.push(format!("--view {view_str}"));
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(dir) = &flags.storage_dir {
        lines.push(format!("--storage-dir {}", dir.display()));
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
        if token == "--no-autosave" {
            flags.no_autosave = true;
        } else if token == "--autosave-ms" {
            if let Some(next) = tokens.get(i + 1) {
                flags.autosave_ms = next.parse().ok();
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--autosave-ms=") {
            flags.autosave_ms = value.parse().ok();
        } else if token == "--view" {
            if let Some(next) = tokens.get(i + 1) {
                flags.view = parse_view(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--view=") {
            flags.view = parse_view(value);
        } else if token == "--theme" {
            if let Some(next) = tokens.get(i + 1) {
                flags.theme = parse_theme(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--theme=") {
            flags.theme = parse_theme(value);
        } else if token == "--storage-dir" {
            if let Some(next) = tokens.get(i + 1) {
                flags.storage_dir = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--storage-dir=") {
            flags.storage_dir = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_view(s: &str) -> Option<ViewChoice> {
    match s {
        "edit" => Some(ViewChoice::Edit),
        "split" => Some(ViewChoice::Split),
        "preview" => Some(ViewChoice::Preview),
        _ => None,
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "markpad".to_string(),
            "--no-autosave".to_string(),
            "--autosave-ms".to_string(),
            "2500".to_string(),
            "--view=preview".to_string(),
            "--theme".to_string(),
            "dark".to_string(),
            "--storage-dir=/tmp/markpad".to_string(),
            "notes.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.no_autosave);
        assert_eq!(flags.autosave_ms, Some(2500));
        assert_eq!(flags.view, Some(ViewChoice::Preview));
        assert_eq!(flags.theme, Some(ThemeMode::Dark));
        assert_eq!(flags.storage_dir, Some(PathBuf::from("/tmp/markpad")));
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            no_autosave: true,
            theme: Some(ThemeMode::Light),
            view: Some(ViewChoice::Edit),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            theme: Some(ThemeMode::Dark),
            autosave_ms: Some(1000),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.no_autosave);
        assert_eq!(merged.theme, Some(ThemeMode::Dark));
        assert_eq!(merged.view, Some(ViewChoice::Edit));
        assert_eq!(merged.autosave_ms, Some(1000));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".markpadrc");
        let flags = ConfigFlags {
            no_autosave: true,
            autosave_ms: Some(2000),
            view: Some(ViewChoice::Split),
            theme: Some(ThemeMode::Dark),
            storage_dir: Some(PathBuf::from("store")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
