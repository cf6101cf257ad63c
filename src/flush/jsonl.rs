//! JSONL archival of finished wars. A war leaves the store only through
//! here: the header (scores, roster) goes out first, then one log line per
//! record. Best-effort by design — an IO failure leaves the war in place
//! and game state untouched.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{Combatant, GameState, WarOutcome, WarScoreData};

/// Header record of an archived war, written as the first JSONL line.
/// Field names match the external save store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedWar {
    pub name: String,
    pub start_turn: u32,
    pub end_turn: u32,
    pub outcome: WarOutcome,
    #[serde(rename = "attackerWarScore")]
    pub attacker_score: WarScoreData,
    #[serde(rename = "defenderWarScore")]
    pub defender_score: WarScoreData,
    pub combatants: BTreeMap<u64, Combatant>,
}

fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Export a finished war to `<dir>/<name>.jsonl` and remove it from the
/// store. Returns the written path.
///
/// # Panics
/// Panics if the war is still pending — ongoing wars are never archived.
pub fn archive_war(state: &mut GameState, war_id: u64, dir: &Path) -> io::Result<PathBuf> {
    let war = state.war(war_id);
    assert!(
        !war.is_ongoing(),
        "war '{}' is still ongoing and cannot be archived",
        war.name
    );

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.jsonl", file_stem(&war.name)));

    let header = ArchivedWar {
        name: war.name.clone(),
        start_turn: war.start_turn,
        end_turn: war.end_turn,
        outcome: war.outcome,
        attacker_score: war.attacker_score.clone(),
        defender_score: war.defender_score.clone(),
        combatants: war.combatants.clone(),
    };
    let mut lines = vec![serde_json::to_value(&header)?];
    for entry in &war.log {
        lines.push(serde_json::to_value(entry)?);
    }
    write_jsonl(&path, lines.into_iter())?;

    // Only now that the export is on disk does the war leave the store.
    state.wars.remove(&war_id);
    Ok(path)
}
