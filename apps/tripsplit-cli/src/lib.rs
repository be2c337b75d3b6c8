//! # TripSplit CLI
//!
//! Loads a trip file into the in-memory collaborators, settles it and
//! reports the result.
//!
//! ## Trip File
//! ```json
//! {
//!   "participants": [ { "id": "ana", "name": "Ana" } ],
//!   "expenses": [
//!     { "id": "e1", "tripId": "lisbon", "amount": 9000, "currency": "EUR",
//!       "paidBy": "ana", "split": { "type": "EQUAL", "entries": [ { "participantId": "ana" } ] } }
//!   ]
//! }
//! ```
//!
//! ## Exit Codes
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | settled, response JSON on stdout          |
//! | 2    | rejected input (4xx), error JSON on stdout |
//! | 1    | internal failure (5xx) or unreadable file |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use tripsplit_core::ExpenseInput;
use tripsplit_service::{
    ApiError, EngineConfig, InMemoryDirectory, InMemoryExpenseRepository, ParticipantProfile,
    SettlementResponse, SettlementService,
};

pub const EXIT_OK: i32 = 0;
pub const EXIT_INTERNAL: i32 = 1;
pub const EXIT_REJECTED: i32 = 2;

pub const USAGE: &str = "\
TripSplit - settle shared trip expenses

Usage: tripsplit [OPTIONS] <FILE>

Options:
  -t, --trip <ID>    Trip to settle (default: the only trip in the file)
  -p, --pretty       Pretty-print the JSON output
  -h, --help         Show this help message

Environment:
  TRIPSPLIT_AMOUNT_TOLERANCE        custom-amount slack in minor units (default: 0)
  TRIPSPLIT_PERCENT_TOLERANCE_BPS   percentage slack in basis points (default: 1)
  TRIPSPLIT_SETTLEMENT_TOLERANCE    droppable planner leftover (default: 1)
  TRIPSPLIT_INCLUDE_BALANCES        include balance breakdown (default: true)
  RUST_LOG                          log filter, logs go to stderr (default: info)";

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Settle(Args),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub file: PathBuf,
    pub trip: Option<String>,
    pub pretty: bool,
}

/// Parses arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut file = None;
    let mut trip = None;
    let mut pretty = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--trip" | "-t" => match args.next() {
                Some(id) => trip = Some(id.as_ref().to_string()),
                None => bail!("--trip needs a value"),
            },
            "--pretty" | "-p" => pretty = true,
            "--help" | "-h" => return Ok(Command::Help),
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            other => {
                if file.replace(PathBuf::from(other)).is_some() {
                    bail!("only one trip file may be given");
                }
            }
        }
    }

    match file {
        Some(file) => Ok(Command::Settle(Args { file, trip, pretty })),
        None => bail!("missing trip file"),
    }
}

// =============================================================================
// Trip File
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripFile {
    #[serde(default)]
    pub participants: Vec<ParticipantProfile>,
    #[serde(default)]
    pub expenses: Vec<ExpenseInput>,
}

impl TripFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Loads the file's contents into in-memory collaborators. Only trips
    /// that have expenses in the file exist afterwards.
    pub fn into_store(self) -> Result<TripStore> {
        let expenses = InMemoryExpenseRepository::new();
        for expense in self.expenses {
            expenses.insert(expense)?;
        }
        Ok(TripStore {
            expenses,
            directory: InMemoryDirectory::from_profiles(self.participants),
        })
    }
}

/// A loaded trip file.
#[derive(Debug)]
pub struct TripStore {
    expenses: InMemoryExpenseRepository,
    directory: InMemoryDirectory,
}

impl TripStore {
    /// The trip to settle: `requested`, or the only trip in the store.
    ///
    /// A requested trip is not checked here; settling an unknown one
    /// reports `NOT_FOUND`.
    pub fn pick_trip(&self, requested: Option<&str>) -> Result<String> {
        if let Some(trip) = requested {
            return Ok(trip.to_string());
        }

        let trips = self.expenses.trip_ids()?;
        match trips.as_slice() {
            [only] => Ok(only.clone()),
            [] => bail!("trip file has no expenses; pass --trip"),
            _ => bail!("trip file holds several trips ({}); pass --trip", trips.join(", ")),
        }
    }

    /// Settles `trip_id` against the loaded expenses.
    pub fn settle(self, trip_id: &str, config: EngineConfig) -> Result<SettlementResponse, ApiError> {
        SettlementService::new(self.expenses, self.directory, config).settle_trip(trip_id)
    }
}

// =============================================================================
// Entry
// =============================================================================

/// Runs one invocation and returns the process exit code. Output JSON is
/// written to stdout.
pub fn run(args: Args) -> Result<i32> {
    let config = EngineConfig::load()?;
    let store = TripFile::load(&args.file)?.into_store()?;
    let trip_id = store.pick_trip(args.trip.as_deref())?;
    info!(trip_id = %trip_id, file = %args.file.display(), "Settling trip");

    let (body, code) = match store.settle(&trip_id, config) {
        Ok(response) => (to_json(&response, args.pretty)?, EXIT_OK),
        Err(err) => (to_json(&err, args.pretty)?, exit_code(&err)),
    };
    println!("{}", body);
    Ok(code)
}

pub fn exit_code(err: &ApiError) -> i32 {
    if err.code.is_client_error() {
        EXIT_REJECTED
    } else {
        EXIT_INTERNAL
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let body = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(body)
}
