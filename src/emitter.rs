use serde::Serialize;

/// Logical location of the operation an engine is currently performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CheckpointTag {
    Begin,
    // bubble
    RoundStart,
    Compare,
    Swap,
    NoSwap,
    RoundDone,
    EarlyExit,
    // quick
    RecurseEnter,
    PivotChosen,
    MoveLeft,
    PivotPlaced,
    // merge
    Split,
    MergeStart,
    TakeLeft,
    TakeRight,
    DrainLeft,
    DrainRight,
}

/// A single change to the session state, produced by an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Highlight {
        a: Option<usize>,
        b: Option<usize>,
        c: Option<usize>,
    },
    Step {
        text: String,
        tag: CheckpointTag,
    },
    Compared,
    /// One element exchange; carries the array after the swap.
    Swapped(Vec<i32>),
    /// An overwrite that is not an exchange (merge writes).
    Written(Vec<i32>),
    Sorted(usize),
    SortedRange {
        left: usize,
        right: usize,
    },
}

/// Where an engine's mutations go.
pub trait Observer {
    fn publish(&mut self, mutation: Mutation);
}

/// Narrates a run: every publish from an engine goes through here.
pub struct StepEmitter<'a> {
    out: &'a mut dyn Observer,
    steps: u64,
}

impl<'a> StepEmitter<'a> {
    pub fn new(out: &'a mut dyn Observer) -> Self {
        Self { out, steps: 0 }
    }

    pub fn emit(&mut self, text: impl Into<String>, tag: CheckpointTag) {
        self.steps += 1;
        self.out.publish(Mutation::Step {
            text: text.into(),
            tag,
        });
    }

    pub fn highlight(&mut self, a: Option<usize>, b: Option<usize>, c: Option<usize>) {
        self.out.publish(Mutation::Highlight { a, b, c });
    }

    pub fn compared(&mut self) {
        self.out.publish(Mutation::Compared);
    }

    pub fn swapped(&mut self, data: &[i32]) {
        self.out.publish(Mutation::Swapped(data.to_vec()));
    }

    pub fn written(&mut self, data: &[i32]) {
        self.out.publish(Mutation::Written(data.to_vec()));
    }

    pub fn mark_sorted(&mut self, index: usize) {
        self.out.publish(Mutation::Sorted(index));
    }

    pub fn mark_range(&mut self, left: usize, right: usize) {
        self.out.publish(Mutation::SortedRange { left, right });
    }

    /// Steps emitted through this emitter so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl Observer for Vec<Mutation> {
    fn publish(&mut self, mutation: Mutation) {
        self.push(mutation);
    }
}
