// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// The content of one cell of the input table.
///
/// This is independent from the library used to decode the spreadsheet.
/// Readers translate their own cell types into this one.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    /// Any other content (cell errors, ...), kept as the text the spreadsheet displays.
    Other(String),
}

impl Cell {
    /// The text of the cell, as it would be displayed.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => "".to_string(),
            Cell::String(s) => s.clone(),
            // The shortest representation: 12.0 is rendered as 12
            Cell::Float(f) => f.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Other(s) => s.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Cell {
        Cell::String(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Cell {
        Cell::Float(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Cell {
        Cell::Int(i)
    }
}

// ******** Session data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct Participant {
    /// Generated when the participant is ingested. Stable for the session.
    pub id: Uuid,
    pub code: String,
    pub name: String,
    /// Always strictly positive for an ingested participant.
    pub weight: f64,
    /// Percentage of the total weight of the list this participant was ingested with.
    /// It is not updated when other participants get excluded by a draw,
    /// use `compute_win_chance` with the eligible participants for that.
    pub win_chance: f64,
}

/// One completed draw.
#[derive(PartialEq, Debug, Clone)]
pub struct DrawRecord {
    pub timestamp: DateTime<Local>,
    pub winner: Participant,
}

#[derive(PartialEq, Debug, Clone)]
pub struct DrawOutcome {
    pub winner: Participant,
}

// ******** Errors *********

/// Errors while turning a file into a list of participants.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum IngestError {
    /// The file name does not end with a spreadsheet extension.
    BadExtension { file_name: String },
    /// The underlying spreadsheet could not be decoded.
    ParseFailure { detail: String },
    /// The file was read but no row describes a valid participant.
    NoValidRows,
}

impl Error for IngestError {}

impl Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::BadExtension { file_name } => write!(
                f,
                "Please provide an Excel file (.xlsx or .xls), got {}",
                file_name
            ),
            IngestError::ParseFailure { .. } => write!(
                f,
                "Error while processing the file. Check the format (column A: code, B: name, C: weight)."
            ),
            IngestError::NoValidRows => write!(
                f,
                "No valid participant found. Check that the columns A (code), B (name) and C (weight) are filled in."
            ),
        }
    }
}

/// Errors that prevent a draw from starting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DrawError {
    /// Every participant already won in the current history.
    ExhaustedPool,
    /// A reveal is still running.
    AlreadyInProgress,
}

impl Error for DrawError {}

impl Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::ExhaustedPool => {
                write!(f, "All the participants have already been drawn in this cycle.")
            }
            DrawError::AlreadyInProgress => write!(f, "A draw is already in progress."),
        }
    }
}

// ********* Configuration **********

/// Timing of the reveal animation.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RevealTiming {
    pub duration: Duration,
    pub tick_interval: Duration,
}

impl RevealTiming {
    pub const DEFAULT_TIMING: RevealTiming = RevealTiming {
        duration: Duration::from_millis(3000),
        tick_interval: Duration::from_millis(50),
    };
}

impl Default for RevealTiming {
    fn default() -> Self {
        RevealTiming::DEFAULT_TIMING
    }
}
