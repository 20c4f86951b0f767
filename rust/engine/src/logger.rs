use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::PlayerAction;
use crate::cards::Card;
use crate::rules::Street;

/// One applied action. `fault` describes what the seat actually answered
/// when the engine had to play something else for it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub player: String,
    pub street: Street,
    pub action: PlayerAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// Complete record of a played round, one JSON line per round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub match_id: String,
    pub round: u32,
    /// Player names by seat for this round.
    pub seats: [String; 2],
    pub hands: [Vec<Card>; 2],
    /// Board cards dealt by the time betting closed.
    pub board: Vec<Card>,
    pub actions: Vec<ActionRecord>,
    pub deltas: [i32; 2],
    pub showdown: bool,
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    pub fn faults(&self) -> impl Iterator<Item = &ActionRecord> {
        self.actions.iter().filter(|a| a.fault.is_some())
    }
}

/// Appends [`RoundRecord`]s to a JSONL file.
pub struct RoundLogger {
    writer: BufWriter<File>,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(f),
        })
    }

    pub fn write(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

pub fn read_records<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<RoundRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line).map_err(std::io::Error::other)?);
    }
    Ok(out)
}
