use itertools::Itertools;
use rand::Rng;

use crate::error::Error;

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 100;

/// `length` independent uniform integers in `[min, max]`.
pub fn random_array<R: Rng + ?Sized>(rng: &mut R, length: usize, min: i32, max: i32) -> Vec<i32> {
    (0..length).map(|_| rng.gen_range(min..=max)).collect()
}

/// Delay in time units for a playback speed. Faster speed, shorter delay.
pub fn delay_from_speed(speed: u8) -> u32 {
    101 - u32::from(speed.clamp(MIN_SPEED, MAX_SPEED))
}

pub fn swap(data: &mut [i32], i: usize, j: usize) {
    if i != j {
        data.swap(i, j);
    }
}

pub fn is_sorted(data: &[i32]) -> bool {
    data.iter().tuple_windows().all(|(a, b)| a <= b)
}

/// Parses a comma or whitespace separated list such as `"5, 3, 8, 1"`.
pub fn parse_values(input: &str) -> Result<Vec<i32>, Error> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| Error::InvalidValues(format!("'{s}' is not an integer")))
        })
        .collect()
}
