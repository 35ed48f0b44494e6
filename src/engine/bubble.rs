use super::{gate, Algorithm, SortEngine};
use crate::controller::{Flow, Suspend};
use crate::emitter::{CheckpointTag, StepEmitter};
use crate::util::swap;

/// Adjacent compare-and-swap passes, stopping early after a pass with no swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl SortEngine for BubbleSort {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Bubble
    }

    fn run(&self, data: &mut [i32], ctl: &dyn Suspend, out: &mut StepEmitter<'_>) -> Flow {
        if data.len() < 2 {
            return Ok(());
        }
        let max = data.len() - 1;

        gate(ctl)?;
        out.emit("Starting bubble sort", CheckpointTag::Begin);

        for round in 0..max {
            gate(ctl)?;
            out.emit(
                format!("Round {} begins", round + 1),
                CheckpointTag::RoundStart,
            );
            let mut swapped = false;

            for i in 0..max - round {
                gate(ctl)?;
                out.highlight(Some(i), Some(i + 1), None);
                out.emit(
                    format!("Compare arr[{i}]={} with arr[{}]={}", data[i], i + 1, data[i + 1]),
                    CheckpointTag::Compare,
                );
                out.compared();
                ctl.paced_delay()?;

                if data[i] > data[i + 1] {
                    out.emit(
                        format!("{} > {}, swap them", data[i], data[i + 1]),
                        CheckpointTag::Swap,
                    );
                    swap(data, i, i + 1);
                    out.swapped(data);
                    swapped = true;
                } else {
                    out.emit(
                        format!("{} <= {}, leave them", data[i], data[i + 1]),
                        CheckpointTag::NoSwap,
                    );
                }
                ctl.paced_delay()?;
            }

            gate(ctl)?;
            out.mark_sorted(max - round);
            out.emit(
                format!("Round {} done, position {} is final", round + 1, max - round),
                CheckpointTag::RoundDone,
            );

            if !swapped {
                out.emit("No swaps in this round, finishing early", CheckpointTag::EarlyExit);
                break;
            }
        }

        Ok(())
    }
}
