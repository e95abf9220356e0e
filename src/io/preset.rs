//! Report-type presets stored under `presets/<name>.toml`.
//!
//! A preset is a mapping of report-type options consumed only for display
//! and metadata by the CLI; the core decision logic never reads it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

/// Loaded preset: raw TOML table plus the name it resolves to.
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: String,
    pub options: toml::Table,
}

/// Load a preset by name from the presets directory.
///
/// A missing preset is an input error; the message lists what is available
/// so the operator can correct the flag without spelunking.
pub fn load_preset(presets_dir: &Path, preset_name: &str) -> Result<Preset> {
    let path = presets_dir.join(format!("{preset_name}.toml"));
    if !path.exists() {
        let available = list_presets(presets_dir);
        return Err(anyhow!(
            "preset not found: {} (available: {})",
            path.display(),
            if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            }
        ));
    }

    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let options: toml::Table =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    let name = options
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(preset_name)
        .to_string();
    Ok(Preset { name, options })
}

/// Preset stems found in the presets directory, sorted.
pub fn list_presets(presets_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(presets_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_named_preset() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join("consultant-report.toml"),
            "name = \"Consultant Report\"\naudience = \"executives\"\n",
        )
        .expect("write");

        let preset = load_preset(temp.path(), "consultant-report").expect("load");
        assert_eq!(preset.name, "Consultant Report");
        assert_eq!(
            preset.options.get("audience").and_then(|v| v.as_str()),
            Some("executives")
        );
    }

    #[test]
    fn missing_preset_lists_available() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("marketing-report.toml"), "").expect("write");

        let err = load_preset(temp.path(), "nope").expect_err("should fail");
        assert!(err.to_string().contains("marketing-report"));
    }

    #[test]
    fn preset_without_name_falls_back_to_stem() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("plain.toml"), "tone = \"dry\"\n").expect("write");

        let preset = load_preset(temp.path(), "plain").expect("load");
        assert_eq!(preset.name, "plain");
    }
}
