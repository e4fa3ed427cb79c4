//! Save/load
//!
//! Serialized form of the persisted affix state: a version number, the
//! composed label, affix def names, and naming rules flattened to
//! `class->word` tokens. Loading tolerates older saves whose labels still
//! carry inline color markup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::AffixState;
use crate::naming::AffixRule;

/// Save file version for compatibility checking.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// On-disk shape of one item's affix state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixSaveData {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub full_label: Option<String>,
    #[serde(default)]
    pub affixes: Vec<String>,
    /// Naming rules as `class->word` tokens.
    #[serde(default)]
    pub rules: Vec<String>,
}

impl AffixSaveData {
    pub fn from_state(state: &AffixState) -> Self {
        Self {
            version: SAVE_VERSION,
            full_label: state.full_label.clone(),
            affixes: state.affixes.clone(),
            rules: state.rules.iter().map(AffixRule::token).collect(),
        }
    }

    /// Reconstruct live state. Unparseable rule tokens become
    /// fallback-class rules so the rule count stays aligned with the
    /// affix count; old labels get their markup stripped.
    pub fn into_state(self) -> AffixState {
        AffixState {
            full_label: self.full_label.map(|l| strip_markup(&l)),
            affixes: self.affixes,
            rules: self
                .rules
                .into_iter()
                .map(|token| {
                    AffixRule::parse(&token).unwrap_or_else(|| AffixRule::fallback(token))
                })
                .collect(),
        }
    }
}

/// Write one item's affix state as pretty JSON.
pub fn save_state(state: &AffixState, path: &Path) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(&AffixSaveData::from_state(state))?;
    fs::write(path, json)?;
    log::info!("affix state saved to {}", path.display());
    Ok(())
}

/// Load one item's affix state, rejecting newer save versions.
pub fn load_state(path: &Path) -> Result<AffixState, SaveError> {
    let data = fs::read_to_string(path)?;
    let save: AffixSaveData = serde_json::from_str(&data)?;
    if save.version > SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(save.into_state())
}

/// Strip `<...>` markup runs that older versions embedded in labels.
fn strip_markup(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut depth = 0usize;
    for c in label.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AffixState {
        AffixState {
            full_label: Some("Grim steel longsword of Doom".into()),
            affixes: vec!["grim".into(), "doom".into()],
            rules: vec![
                AffixRule { class: "adjective".into(), word: "Grim".into() },
                AffixRule { class: "noun".into(), word: "Doom".into() },
            ],
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let data = AffixSaveData::from_state(&state());
        assert_eq!(data.version, SAVE_VERSION);
        assert_eq!(data.rules, vec!["adjective->Grim", "noun->Doom"]);

        let json = serde_json::to_string(&data).unwrap();
        let back: AffixSaveData = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_state(), state());
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join("runebrand_save_test.json");
        save_state(&state(), &path).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded, state());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_newer_version_rejected() {
        let path = std::env::temp_dir().join("runebrand_save_version_test.json");
        let json = format!(
            "{{\"version\": {}, \"affixes\": [], \"rules\": []}}",
            SAVE_VERSION + 1
        );
        fs::write(&path, json).unwrap();
        let err = load_state(&path).unwrap_err();
        assert!(matches!(err, SaveError::VersionMismatch { .. }));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_markup_stripped_on_load() {
        let data = AffixSaveData {
            version: 0,
            full_label: Some("<color=#ffcc33>Grim</color> steel longsword".into()),
            affixes: vec!["grim".into()],
            rules: vec!["adjective->Grim".into()],
        };
        let loaded = data.into_state();
        assert_eq!(loaded.full_label.as_deref(), Some("Grim steel longsword"));
    }

    #[test]
    fn test_bad_rule_token_becomes_fallback() {
        let data = AffixSaveData {
            version: SAVE_VERSION,
            full_label: None,
            affixes: vec!["grim".into()],
            rules: vec!["no arrow here".into()],
        };
        let loaded = data.into_state();
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.rules[0].class, crate::naming::FALLBACK_CLASS);
        assert_eq!(loaded.rules[0].word, "no arrow here");
    }

    #[test]
    fn test_missing_fields_default() {
        let loaded: AffixSaveData = serde_json::from_str("{}").unwrap();
        let state = loaded.into_state();
        assert!(state.affixes.is_empty());
        assert!(state.full_label.is_none());
    }
}
