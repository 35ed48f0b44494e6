use crate::emitter::CheckpointTag;
use crate::engine::Algorithm;

const BUBBLE: &[&str] = &[
    "for (j = 0; j < n - 1; j++) {",
    "  swapped = false;",
    "  for (i = 0; i < n - 1 - j; i++) {",
    "    if (arr[i] > arr[i + 1]) {",
    "      swap(arr, i, i + 1); swapped = true;",
    "    }",
    "  }",
    "  mark(n - 1 - j);",
    "  if (!swapped) break;",
    "}",
];

const QUICK: &[&str] = &[
    "quickSort(arr, low, high) {",
    "  if (low < high) {",
    "    pivot = arr[high]; i = low;",
    "    for (j = low; j < high; j++)",
    "      if (arr[j] < pivot) swap(arr, i++, j);",
    "    swap(arr, i, high); mark(i);",
    "    quickSort(arr, low, i - 1);",
    "    quickSort(arr, i + 1, high);",
    "  }",
    "}",
];

const MERGE: &[&str] = &[
    "mergeSort(arr, left, right) {",
    "  if (left < right) {",
    "    mid = floor((left + right) / 2);",
    "    mergeSort(arr, left, mid);",
    "    mergeSort(arr, mid + 1, right);",
    "    merge(arr, left, mid, right);",
    "  }",
    "}",
    "merge: while (i <= mid && j <= right)",
    "  arr[k++] = L[i] <= R[j] ? L[i++] : R[j++];",
    "copy the rest of L, then the rest of R",
];

pub fn listing(algorithm: Algorithm) -> &'static [&'static str] {
    match algorithm {
        Algorithm::Bubble => BUBBLE,
        Algorithm::Quick => QUICK,
        Algorithm::Merge => MERGE,
    }
}

/// Zero-based line of [`listing`] matching `tag`, if the tag belongs to the algorithm.
pub fn line(algorithm: Algorithm, tag: CheckpointTag) -> Option<usize> {
    use CheckpointTag::*;

    match (algorithm, tag) {
        (_, Begin) => Some(0),

        (Algorithm::Bubble, RoundStart) => Some(1),
        (Algorithm::Bubble, Compare) => Some(3),
        (Algorithm::Bubble, Swap) => Some(4),
        (Algorithm::Bubble, NoSwap) => Some(5),
        (Algorithm::Bubble, RoundDone) => Some(7),
        (Algorithm::Bubble, EarlyExit) => Some(8),

        (Algorithm::Quick, RecurseEnter) => Some(1),
        (Algorithm::Quick, PivotChosen) => Some(2),
        (Algorithm::Quick, Compare) => Some(3),
        (Algorithm::Quick, MoveLeft) => Some(4),
        (Algorithm::Quick, PivotPlaced) => Some(5),

        (Algorithm::Merge, Split) => Some(2),
        (Algorithm::Merge, MergeStart) => Some(5),
        (Algorithm::Merge, Compare) => Some(8),
        (Algorithm::Merge, TakeLeft | TakeRight) => Some(9),
        (Algorithm::Merge, DrainLeft | DrainRight) => Some(10),

        _ => None,
    }
}
