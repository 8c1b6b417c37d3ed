//! Serialization of the solver-facing artifacts.
//!
//! Three line-oriented text files are produced: states (`.sta`),
//! labels (`.lab`), and transitions (`.tra`). The transition file
//! can be read back without loss beyond its decimal representation.
//! Writers are generic over `Write` so tests use `Vec<u8>` and
//! production code uses `BufWriter<File>`; the path-level `commit_*`
//! variants write to a temporary sibling and rename on success, so a
//! failed run never leaves a partial artifact behind.

use crate::dynamics::Dynamics;
use crate::error::MdpError;
use crate::state_space::StateSpace;
use crate::table::TransitionTable;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use veer_core::{ActionId, StateId, Transition};

/// Write the state file: field-name header, one `id:(fields)` line per
/// state, error state last with sentinel values.
pub fn write_states<W: Write>(
    w: &mut W,
    model: &dyn Dynamics,
    states: &StateSpace,
) -> io::Result<()> {
    writeln!(w, "({})", model.field_names().join(","))?;
    for (id, config) in states.iter() {
        write_state_line(w, id, &model.encode_fields(config))?;
    }
    write_state_line(w, states.error_state(), &model.sentinel_fields())
}

fn write_state_line<W: Write>(w: &mut W, id: StateId, fields: &[i32]) -> io::Result<()> {
    let fields: Vec<String> = fields.iter().map(i32::to_string).collect();
    writeln!(w, "{id}:({})", fields.join(","))
}

/// Write the label file: the fixed label header plus the initial-state
/// assignment.
pub fn write_labels<W: Write>(w: &mut W, initial: StateId) -> io::Result<()> {
    writeln!(w, "0=\"init\" 1=\"deadlock\"")?;
    writeln!(w, "{initial}: 0")
}

/// Write the transition file: `<states> <size-hint> <records>` header
/// followed by one record per line, error self-loop last.
pub fn write_transitions<W: Write>(w: &mut W, table: &TransitionTable) -> io::Result<()> {
    writeln!(
        w,
        "{} {} {}",
        table.num_states(),
        table.size_hint(),
        table.records().len()
    )?;
    for t in table.records() {
        writeln!(w, "{} {} {} {}", t.source, t.action, t.dest, t.probability)?;
    }
    Ok(())
}

/// Read a transition file back into a table.
///
/// The header's record count must match the records present; each
/// record line must be `<source> <action> <dest> <probability>`.
pub fn read_transitions<R: BufRead>(r: R) -> Result<TransitionTable, MdpError> {
    let mut lines = r.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => line?,
        None => {
            return Err(MdpError::MalformedHeader {
                line: String::new(),
            })
        }
    };
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [states, hint, count] = fields.as_slice() else {
        return Err(MdpError::MalformedHeader { line: header });
    };
    let (Ok(num_states), Ok(size_hint), Ok(declared)) = (
        states.parse::<u32>(),
        hint.parse::<u64>(),
        count.parse::<usize>(),
    ) else {
        return Err(MdpError::MalformedHeader { line: header });
    };

    let mut records = Vec::with_capacity(declared);
    for (idx, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(parse_record(idx + 1, &line)?);
    }
    if records.len() != declared {
        return Err(MdpError::RecordCountMismatch {
            declared,
            found: records.len(),
        });
    }
    TransitionTable::from_records(num_states, size_hint, records)
}

fn parse_record(line_no: usize, line: &str) -> Result<Transition, MdpError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [source, action, dest, probability] = fields.as_slice() else {
        return Err(MdpError::MalformedRecord {
            line_no,
            reason: format!("expected 4 fields, got {}", fields.len()),
        });
    };
    let parse_id = |s: &str| -> Result<u32, MdpError> {
        s.parse().map_err(|_| MdpError::MalformedRecord {
            line_no,
            reason: format!("not an integer: {s:?}"),
        })
    };
    let probability = probability
        .parse::<f64>()
        .map_err(|_| MdpError::MalformedRecord {
            line_no,
            reason: format!("not a probability: {probability:?}"),
        })?;
    Ok(Transition {
        source: StateId(parse_id(source)?),
        action: ActionId(parse_id(action)?),
        dest: StateId(parse_id(dest)?),
        probability,
    })
}

/// Read a transition file from disk.
pub fn read_transitions_file(path: &Path) -> Result<TransitionTable, MdpError> {
    let file = File::open(path)?;
    read_transitions(BufReader::new(file))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Run a writer against a temporary sibling of `path`, renaming into
/// place only on success.
fn commit_atomic(
    path: &Path,
    write_fn: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), MdpError> {
    let tmp = tmp_path(path);
    let result = (|| {
        let mut w = BufWriter::new(File::create(&tmp)?);
        write_fn(&mut w)?;
        w.flush()
    })();
    match result {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(MdpError::Io(e))
        }
    }
}

/// Atomically write the state file to `path`.
pub fn commit_states(
    path: &Path,
    model: &dyn Dynamics,
    states: &StateSpace,
) -> Result<(), MdpError> {
    commit_atomic(path, |w| write_states(w, model, states))
}

/// Atomically write the label file to `path`.
pub fn commit_labels(path: &Path, initial: StateId) -> Result<(), MdpError> {
    commit_atomic(path, |w| write_labels(w, initial))
}

/// Atomically write the transition file to `path`.
pub fn commit_transitions(path: &Path, table: &TransitionTable) -> Result<(), MdpError> {
    commit_atomic(path, |w| write_transitions(w, table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_file_maps_initial_state_to_label_zero() {
        let mut buf = Vec::new();
        write_labels(&mut buf, StateId(17)).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "0=\"init\" 1=\"deadlock\"\n17: 0\n"
        );
    }

    #[test]
    fn transition_round_trip_is_exact() {
        let records = vec![
            Transition {
                source: StateId(0),
                action: ActionId(3),
                dest: StateId(1),
                probability: 0.7,
            },
            Transition {
                source: StateId(0),
                action: ActionId(3),
                dest: StateId(2),
                probability: 0.3,
            },
            Transition {
                source: StateId(2),
                action: ActionId(0),
                dest: StateId(2),
                probability: 1.0,
            },
        ];
        let table = TransitionTable::from_records(3, 2, records.clone()).unwrap();

        let mut buf = Vec::new();
        write_transitions(&mut buf, &table).unwrap();
        let reread = read_transitions(buf.as_slice()).unwrap();

        assert_eq!(reread.records(), records.as_slice());
        assert_eq!(reread.num_states(), 3);
        assert_eq!(reread.size_hint(), 2);
    }

    #[test]
    fn malformed_header_is_rejected() {
        match read_transitions("3 2\n".as_bytes()) {
            Err(MdpError::MalformedHeader { .. }) => {}
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        let text = "2 1 1\n0 0 1\n";
        match read_transitions(text.as_bytes()) {
            Err(MdpError::MalformedRecord { line_no: 2, .. }) => {}
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn record_count_mismatch_is_rejected() {
        let text = "2 2 2\n0 0 1 1.0\n";
        match read_transitions(text.as_bytes()) {
            Err(MdpError::RecordCountMismatch {
                declared: 2,
                found: 1,
            }) => {}
            other => panic!("expected RecordCountMismatch, got {other:?}"),
        }
    }
}
