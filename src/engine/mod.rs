mod bubble;
mod merge;
mod quick;

use std::str::FromStr;

use serde::Serialize;

pub use bubble::BubbleSort;
pub use merge::MergeSort;
pub use quick::{partition, QuickSort};

use crate::controller::{Flow, Suspend};
use crate::emitter::StepEmitter;
use crate::error::Error;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Algorithm {
    Bubble,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bubble, Algorithm::Quick, Algorithm::Merge];

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "Bubble Sort",
            Algorithm::Quick => "Quick Sort",
            Algorithm::Merge => "Merge Sort",
        }
    }

    pub fn engine(self) -> Box<dyn SortEngine> {
        match self {
            Algorithm::Bubble => Box::new(BubbleSort),
            Algorithm::Quick => Box::new(QuickSort),
            Algorithm::Merge => Box::new(MergeSort),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bubble" => Ok(Algorithm::Bubble),
            "quick" => Ok(Algorithm::Quick),
            "merge" => Ok(Algorithm::Merge),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// A sorting routine with suspension points woven in. A stop surfaces as
/// `Err(Stopped)` from a suspension point and unwinds the call stack via `?`.
pub trait SortEngine: Send {
    fn algorithm(&self) -> Algorithm;

    /// Sorts `data` in place. Returns `Err(Stopped)` if a stop was observed.
    fn run(&self, data: &mut [i32], ctl: &dyn Suspend, out: &mut StepEmitter<'_>) -> Flow;
}

/// Entry to every loop iteration: wait out a pause, then confirm no stop is pending.
fn gate(ctl: &dyn Suspend) -> Flow {
    ctl.await_pause()?;
    ctl.checkpoint()
}
