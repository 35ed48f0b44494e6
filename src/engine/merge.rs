use super::{gate, Algorithm, SortEngine};
use crate::controller::{Flow, Suspend};
use crate::emitter::{CheckpointTag, StepEmitter};

/// Top-down merge sort. Ties take the left half first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSort;

impl SortEngine for MergeSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Merge
    }

    fn run(&self, data: &mut [i32], ctl: &dyn Suspend, out: &mut StepEmitter<'_>) -> Flow {
        if data.len() < 2 {
            return Ok(());
        }

        gate(ctl)?;
        out.emit("Starting merge sort", CheckpointTag::Begin);
        merge_sort(data, 0, data.len() - 1, ctl, out)
    }
}

fn merge_sort(
    data: &mut [i32],
    left: usize,
    right: usize,
    ctl: &dyn Suspend,
    out: &mut StepEmitter<'_>,
) -> Flow {
    if left >= right {
        return Ok(());
    }

    let mid = (left + right) / 2;
    gate(ctl)?;
    out.emit(
        format!(
            "Split [{left}, {right}] into [{left}, {mid}] and [{}, {right}]",
            mid + 1
        ),
        CheckpointTag::Split,
    );
    ctl.paced_delay()?;

    merge_sort(data, left, mid, ctl, out)?;
    merge_sort(data, mid + 1, right, ctl, out)?;
    merge(data, left, mid, right, ctl, out)
}

fn merge(
    data: &mut [i32],
    left: usize,
    mid: usize,
    right: usize,
    ctl: &dyn Suspend,
    out: &mut StepEmitter<'_>,
) -> Flow {
    let lhs = data[left..=mid].to_vec();
    let rhs = data[mid + 1..=right].to_vec();

    gate(ctl)?;
    out.emit(
        format!(
            "Merge [{left}, {mid}] with [{}, {right}]",
            mid + 1
        ),
        CheckpointTag::MergeStart,
    );
    ctl.paced_delay()?;

    let (mut i, mut j, mut k) = (0, 0, left);

    while i < lhs.len() && j < rhs.len() {
        gate(ctl)?;
        out.highlight(Some(k), Some(left + i), Some(mid + 1 + j));
        out.emit(
            format!("Compare {} with {}", lhs[i], rhs[j]),
            CheckpointTag::Compare,
        );
        out.compared();
        ctl.paced_delay()?;

        if lhs[i] <= rhs[j] {
            data[k] = lhs[i];
            out.emit(
                format!("Take {} from the left into position {k}", lhs[i]),
                CheckpointTag::TakeLeft,
            );
            i += 1;
        } else {
            data[k] = rhs[j];
            out.emit(
                format!("Take {} from the right into position {k}", rhs[j]),
                CheckpointTag::TakeRight,
            );
            j += 1;
        }
        out.written(data);
        k += 1;
        ctl.paced_delay()?;
    }

    for (&value, tag) in lhs[i..]
        .iter()
        .map(|v| (v, CheckpointTag::DrainLeft))
        .chain(rhs[j..].iter().map(|v| (v, CheckpointTag::DrainRight)))
    {
        gate(ctl)?;
        out.highlight(Some(k), None, None);
        out.emit(format!("Copy remaining {value} into position {k}"), tag);
        data[k] = value;
        out.written(data);
        k += 1;
        ctl.paced_delay()?;
    }

    // Only the outermost merge puts values in their final place.
    if left == 0 && right + 1 == data.len() {
        out.mark_range(left, right);
    }
    Ok(())
}
