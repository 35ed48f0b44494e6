use super::{gate, Algorithm, SortEngine};
use crate::controller::{Flow, Stopped, Suspend};
use crate::emitter::{CheckpointTag, StepEmitter};
use crate::util::swap;

/// Recursive quick sort over a Lomuto partition, pivot = last element of the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickSort;

impl SortEngine for QuickSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Quick
    }

    fn run(&self, data: &mut [i32], ctl: &dyn Suspend, out: &mut StepEmitter<'_>) -> Flow {
        if data.len() < 2 {
            return Ok(());
        }

        gate(ctl)?;
        out.emit("Starting quick sort", CheckpointTag::Begin);
        quick_sort(data, 0, data.len() - 1, ctl, out)
    }
}

fn quick_sort(
    data: &mut [i32],
    low: usize,
    high: usize,
    ctl: &dyn Suspend,
    out: &mut StepEmitter<'_>,
) -> Flow {
    if low >= high {
        return Ok(());
    }

    gate(ctl)?;
    out.emit(
        format!("Quick sort range [{low}, {high}]"),
        CheckpointTag::RecurseEnter,
    );

    let pivot = partition(data, low, high, ctl, out)?;
    if pivot > low {
        quick_sort(data, low, pivot - 1, ctl, out)?;
    }
    quick_sort(data, pivot + 1, high, ctl, out)
}

/// Lomuto partition of `data[low..=high]`.
///
/// Values strictly less than the pivot end up left of the returned index, all
/// others right of it, and the pivot itself lands on the returned index, which is
/// marked sorted.
pub fn partition(
    data: &mut [i32],
    low: usize,
    high: usize,
    ctl: &dyn Suspend,
    out: &mut StepEmitter<'_>,
) -> Result<usize, Stopped> {
    let pivot = data[high];
    let mut boundary = low;

    gate(ctl)?;
    out.highlight(None, None, Some(high));
    out.emit(
        format!("Choose pivot arr[{high}]={pivot}"),
        CheckpointTag::PivotChosen,
    );
    ctl.paced_delay()?;

    for j in low..high {
        gate(ctl)?;
        out.highlight(Some(boundary), Some(j), Some(high));
        out.emit(
            format!("Compare arr[{j}]={} with pivot {pivot}", data[j]),
            CheckpointTag::Compare,
        );
        out.compared();
        ctl.paced_delay()?;

        if data[j] < pivot {
            out.emit(
                format!("{} < {pivot}, move it left", data[j]),
                CheckpointTag::MoveLeft,
            );
            if boundary != j {
                swap(data, boundary, j);
                out.swapped(data);
            }
            boundary += 1;
        }
        ctl.paced_delay()?;
    }

    gate(ctl)?;
    out.emit(
        format!("Place pivot {pivot} at index {boundary}"),
        CheckpointTag::PivotPlaced,
    );
    if boundary != high {
        swap(data, boundary, high);
        out.swapped(data);
    }
    out.mark_sorted(boundary);

    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Unpaced;
    use crate::emitter::Mutation;
    use crate::engine::testing::Audit;

    fn run(input: &[i32]) -> (Vec<i32>, Audit) {
        let mut data = input.to_vec();
        let mut audit = Audit::new(input);
        let mut out = StepEmitter::new(&mut audit);
        QuickSort.run(&mut data, &Unpaced, &mut out).unwrap();
        (data, audit)
    }

    #[test]
    fn partition_follows_lomuto_semantics() {
        let cases: &[(&[i32], usize, usize)] = &[
            (&[7, 2, 9, 4, 3, 8, 5], 0, 6),
            (&[1, 2, 3, 4, 5], 0, 4),
            (&[5, 4, 3, 2, 1], 0, 4),
            (&[3, 3, 3, 3], 0, 3),
            (&[9, 6, 1, 7, 2, 6, 0], 2, 5),
        ];

        for &(input, low, high) in cases {
            let mut data = input.to_vec();
            let pivot_value = data[high];
            let mut log: Vec<Mutation> = Vec::new();
            let mut out = StepEmitter::new(&mut log);

            let p = partition(&mut data, low, high, &Unpaced, &mut out).unwrap();

            assert!((low..=high).contains(&p));
            assert_eq!(data[p], pivot_value);
            assert!(data[low..p].iter().all(|v| *v < pivot_value), "{input:?}");
            assert!(data[p + 1..=high].iter().all(|v| *v >= pivot_value), "{input:?}");
            // outside the range nothing moves
            assert_eq!(data[..low], input[..low]);
            assert_eq!(data[high + 1..], input[high + 1..]);
            assert!(log.contains(&Mutation::Sorted(p)));
        }
    }

    #[test]
    fn partition_compares_every_element_against_the_pivot_once() {
        let mut data = vec![4, 1, 6, 2, 5];
        let mut log: Vec<Mutation> = Vec::new();
        let mut out = StepEmitter::new(&mut log);
        partition(&mut data, 0, 4, &Unpaced, &mut out).unwrap();
        assert_eq!(log.iter().filter(|m| **m == Mutation::Compared).count(), 4);
    }

    #[test]
    fn swaps_count_only_real_exchanges() {
        // Already sorted: every element is < pivot in place, pivot stays put.
        let (data, audit) = run(&[1, 2, 3, 4]);
        assert_eq!(data, vec![1, 2, 3, 4]);
        assert_eq!(audit.count(|m| matches!(m, Mutation::Swapped(_))), 0);

        let (data, audit) = run(&[2, 1]);
        assert_eq!(data, vec![1, 2]);
        assert_eq!(audit.count(|m| matches!(m, Mutation::Swapped(_))), 1);
    }

    #[test]
    fn pivot_is_highlighted_as_the_third_index() {
        let (_, audit) = run(&[3, 1, 2]);
        assert!(audit.log.contains(&Mutation::Highlight {
            a: None,
            b: None,
            c: Some(2)
        }));
    }

    #[test]
    fn singleton_ranges_emit_no_checkpoints() {
        let (data, audit) = run(&[5]);
        assert_eq!(data, vec![5]);
        assert!(audit.log.is_empty());
    }

    #[test]
    fn recursion_enters_left_before_right() {
        let (_, audit) = run(&[4, 7, 1, 9, 5]);
        let ranges: Vec<String> = audit
            .log
            .iter()
            .filter_map(|m| match m {
                Mutation::Step {
                    text,
                    tag: CheckpointTag::RecurseEnter,
                } => Some(text.clone()),
                _ => None,
            })
            .collect();
        // pivot 5 lands at index 2
        assert_eq!(
            ranges,
            vec![
                "Quick sort range [0, 4]",
                "Quick sort range [0, 1]",
                "Quick sort range [3, 4]",
            ]
        );
    }
}
