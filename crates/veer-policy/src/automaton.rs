//! The finite-memory policy automaton and its strict loader.
//!
//! The artifact is line-oriented: a header with the automaton state
//! count, then per state one introduction line
//! `<control> <memory> <mdp-state> <action>` followed by zero or more
//! continuation lines `-> <successor> <control'> <memory'>`. The parser
//! resolves the two-line-style records into one structured
//! [`PolicyEntry`] per automaton state and fails fast on any malformed
//! line.

use crate::error::PolicyError;
use indexmap::IndexMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use veer_core::{ActionId, StateId};
use veer_mdp::TransitionTable;

/// Prefix marking a successor-mapping continuation line.
const CONTINUATION_MARKER: &str = "->";

/// An automaton coordinate: `(control-state, memory)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cursor {
    /// Control-state component.
    pub control: u32,
    /// Memory component.
    pub memory: u32,
}

impl Cursor {
    /// The automaton's start coordinate.
    pub const INITIAL: Cursor = Cursor {
        control: 0,
        memory: 0,
    };
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.control, self.memory)
    }
}

/// One automaton state: the MDP state it observes, the action it
/// decides, and the next coordinate for every possible MDP successor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyEntry {
    /// MDP state this automaton state corresponds to.
    pub mdp_state: StateId,
    /// Action taken in this automaton state.
    pub action: ActionId,
    /// Next coordinate per sampled MDP successor.
    pub successors: IndexMap<StateId, Cursor>,
}

/// The loaded strategy: a map from [`Cursor`] to [`PolicyEntry`].
///
/// Loaded once at startup and immutable thereafter. A coordinate with
/// no entry is the terminal "crashed" condition, not an error.
#[derive(Clone, Debug, Default)]
pub struct PolicyAutomaton {
    entries: IndexMap<Cursor, PolicyEntry>,
}

impl PolicyAutomaton {
    /// Parse a strategy artifact.
    pub fn parse<R: BufRead>(r: R) -> Result<Self, PolicyError> {
        let mut lines = r.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => line?,
            None => {
                return Err(PolicyError::MalformedHeader {
                    line: String::new(),
                })
            }
        };
        let declared: usize = header
            .trim()
            .parse()
            .map_err(|_| PolicyError::MalformedHeader { line: header })?;

        let mut entries: IndexMap<Cursor, PolicyEntry> = IndexMap::new();
        let mut current: Option<Cursor> = None;

        for (idx, line) in lines {
            let line = line?;
            let line_no = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix(CONTINUATION_MARKER) {
                let fields = parse_fields(line_no, rest, 3)?;
                let cursor = current.ok_or(PolicyError::DanglingContinuation { line_no })?;
                let entry = entries
                    .get_mut(&cursor)
                    .expect("current cursor always has an entry");
                entry.successors.insert(
                    StateId(fields[0]),
                    Cursor {
                        control: fields[1],
                        memory: fields[2],
                    },
                );
            } else {
                let fields = parse_fields(line_no, trimmed, 4)?;
                let cursor = Cursor {
                    control: fields[0],
                    memory: fields[1],
                };
                let entry = PolicyEntry {
                    mdp_state: StateId(fields[2]),
                    action: ActionId(fields[3]),
                    successors: IndexMap::new(),
                };
                if entries.insert(cursor, entry).is_some() {
                    return Err(PolicyError::DuplicateState {
                        control: cursor.control,
                        memory: cursor.memory,
                    });
                }
                current = Some(cursor);
            }
        }

        if entries.len() != declared {
            return Err(PolicyError::StateCountMismatch {
                declared,
                found: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    /// Read and parse a strategy artifact from disk.
    pub fn from_path(path: &Path) -> Result<Self, PolicyError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Entry at `cursor`, or `None` for the terminal crashed condition.
    pub fn entry(&self, cursor: Cursor) -> Option<&PolicyEntry> {
        self.entries.get(&cursor)
    }

    /// Number of automaton states.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the automaton has no states.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(cursor, entry)` in artifact order.
    pub fn iter(&self) -> impl Iterator<Item = (Cursor, &PolicyEntry)> {
        self.entries.iter().map(|(&c, e)| (c, e))
    }

    /// Verify the automaton against the transition table.
    ///
    /// Every MDP successor the table reaches from an entry's
    /// `(mdp_state, action)` must appear in that entry's successor map;
    /// absence means the artifact and the scene/table are mismatched
    /// and is fatal at load time.
    pub fn check_against(&self, table: &TransitionTable) -> Result<(), PolicyError> {
        for (cursor, entry) in self.iter() {
            let successors = table
                .successor_list(entry.mdp_state, entry.action)
                .ok_or(PolicyError::UnknownDecision {
                    state: entry.mdp_state,
                    action: entry.action,
                })?;
            for &(dest, _) in successors {
                if !entry.successors.contains_key(&dest) {
                    return Err(PolicyError::MissingSuccessor {
                        control: cursor.control,
                        memory: cursor.memory,
                        dest,
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_fields(line_no: usize, text: &str, expected: usize) -> Result<Vec<u32>, PolicyError> {
    let raw: Vec<&str> = text.split_whitespace().collect();
    if raw.len() != expected {
        return Err(PolicyError::MalformedLine {
            line_no,
            expected,
            got: raw.len(),
        });
    }
    raw.into_iter()
        .map(|f| {
            f.parse().map_err(|_| PolicyError::MalformedField {
                line_no,
                field: f.to_string(),
            })
        })
        .collect()
}
