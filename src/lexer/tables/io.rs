// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::Path,
};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use thiserror::Error;

use super::{
    CharMask,
    GrammarError,
    N_KINDS,
    Pattern,
    PatternTable,
    State,
    Transition,
    TokenKind,
    reduce,
};

#[derive(Debug, Error)]
pub enum TablesIoError {
    #[error("tables I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tables JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0:?}: pattern has no start state")]
    NoStartState(TokenKind),
    #[error("invalid tables: {0}")]
    Invalid(#[from] GrammarError),
}

// -------------------- JSON (de)serialization --------------------

// u128 masks do not survive JSON numbers; store them as decimal strings.
#[serde_as]
#[derive(Serialize, Deserialize)]
struct TransitionDisk {
    #[serde_as(as = "DisplayFromStr")]
    mask: u128,
    target: usize,
}

#[derive(Serialize, Deserialize)]
struct StateDisk {
    is_final: bool,
    transitions: Vec<TransitionDisk>,
}

#[derive(Serialize, Deserialize)]
struct PatternDisk {
    kind: TokenKind,
    should_emit: bool,
    states: Vec<StateDisk>,
}

#[derive(Serialize, Deserialize)]
struct TablesDisk {
    patterns: Vec<PatternDisk>,
}

impl From<&PatternTable> for TablesDisk {
    fn from(t: &PatternTable) -> Self {
        let patterns = t
            .patterns()
            .iter()
            .map(|p| PatternDisk {
                kind: p.kind,
                should_emit: p.should_emit,
                states: p
                    .states
                    .iter()
                    .map(|s| StateDisk {
                        is_final: s.is_final,
                        transitions: s
                            .transitions
                            .iter()
                            .map(|tr| TransitionDisk {
                                mask: tr.mask.bits(),
                                target: tr.target,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { patterns }
    }
}

impl TablesDisk {
    /// Rebuild the table, re-checking what the compiler guarantees.
    fn into_tables(self) -> Result<PatternTable, TablesIoError> {
        let mut patterns = Vec::with_capacity(self.patterns.len());
        for pd in self.patterns {
            let states: Vec<State> = pd
                .states
                .into_iter()
                .map(|sd| State {
                    is_final: sd.is_final,
                    transitions: sd
                        .transitions
                        .into_iter()
                        .map(|td| Transition {
                            mask: CharMask::from_bits(td.mask),
                            target: td.target,
                        })
                        .collect(),
                })
                .collect();

            if states.is_empty() {
                return Err(TablesIoError::NoStartState(pd.kind));
            }
            if let Some((state, overlap)) = reduce::find_overlap(&states) {
                return Err(GrammarError::OverlappingTransitions {
                    kind: pd.kind,
                    state,
                    overlap,
                }
                .into());
            }
            if let Some((state, target)) = reduce::find_dangling(&states) {
                return Err(GrammarError::DanglingTarget {
                    kind: pd.kind,
                    state,
                    target,
                }
                .into());
            }
            patterns.push(Pattern {
                kind: pd.kind,
                states,
                should_emit: pd.should_emit,
            });
        }

        let table = PatternTable::new(patterns)?;
        if table.len() != N_KINDS {
            warn!(
                "[tables] loaded {} patterns but the grammar has {} token kinds",
                table.len(),
                N_KINDS
            );
        }
        Ok(table)
    }
}

pub fn write_tables_json<W: Write>(w: W, t: &PatternTable) -> Result<(), TablesIoError> {
    serde_json::to_writer_pretty(w, &TablesDisk::from(t))?;
    Ok(())
}

pub fn save_tables_json(path: &Path, t: &PatternTable) -> Result<(), TablesIoError> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    write_tables_json(&mut w, t)?;
    w.flush()?;
    Ok(())
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<PatternTable, TablesIoError> {
    serde_json::from_slice::<TablesDisk>(data)?.into_tables()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tables::patterns;

    #[test]
    fn builtin_tables_round_trip() {
        let mut buf = Vec::new();
        write_tables_json(&mut buf, patterns()).unwrap();
        let back = load_tables_json_bytes(&buf).unwrap();
        assert_eq!(&back, patterns());
    }

    #[test]
    fn masks_are_stored_as_strings() {
        let mut buf = Vec::new();
        write_tables_json(&mut buf, patterns()).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let mask = &v["patterns"][0]["states"][0]["transitions"][0]["mask"];
        // EndOfFile: 0 -\0-> 1
        assert_eq!(mask, &serde_json::Value::String("1".into()));
    }

    #[test]
    fn rejects_overlap_and_dangling_targets() {
        let overlap = br#"{"patterns":[{"kind":"Plus","should_emit":true,"states":[
            {"is_final":false,"transitions":[{"mask":"3","target":1},{"mask":"2","target":0}]},
            {"is_final":true,"transitions":[]}]}]}"#;
        assert!(matches!(
            load_tables_json_bytes(overlap),
            Err(TablesIoError::Invalid(GrammarError::OverlappingTransitions { state: 0, .. }))
        ));

        let dangling = br#"{"patterns":[{"kind":"Plus","should_emit":true,"states":[
            {"is_final":false,"transitions":[{"mask":"1","target":7}]}]}]}"#;
        assert!(matches!(
            load_tables_json_bytes(dangling),
            Err(TablesIoError::Invalid(GrammarError::DanglingTarget { target: 7, .. }))
        ));

        let empty = br#"{"patterns":[{"kind":"Plus","should_emit":true,"states":[]}]}"#;
        assert!(matches!(
            load_tables_json_bytes(empty),
            Err(TablesIoError::NoStartState(TokenKind::Plus))
        ));

        assert!(matches!(
            load_tables_json_bytes(b"{"),
            Err(TablesIoError::Json(_))
        ));
    }
}
