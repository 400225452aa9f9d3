//! Seed data — which matches exist and which session belongs to whom.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use matchchat_core::types::MatchId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSeed {
    pub id: MatchId,
    pub participants: [String; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub matches: Vec<MatchSeed>,

    /// session id -> username
    #[serde(default)]
    pub sessions: HashMap<String, String>,
}

impl Seed {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed: {}", path.display()))?;
        let seed: Seed = serde_yaml::from_str(&content).context("Failed to parse seed file")?;

        for m in &seed.matches {
            if m.participants[0] == m.participants[1] {
                anyhow::bail!("match {} pairs {} with themselves", m.id, m.participants[0]);
            }
        }
        Ok(seed)
    }

    /// `dir/matchchat-web.yaml` if present, the demo seed otherwise.
    pub fn load_or_demo(dir: &Path) -> Result<Self> {
        let path = dir.join("matchchat-web.yaml");
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::demo())
        }
    }

    /// Match 1 between alice and bob.
    pub fn demo() -> Self {
        Seed {
            matches: vec![MatchSeed {
                id: 1,
                participants: ["alice".into(), "bob".into()],
            }],
            sessions: HashMap::from([
                ("alice-session".to_string(), "alice".to_string()),
                ("bob-session".to_string(), "bob".to_string()),
            ]),
        }
    }
}
