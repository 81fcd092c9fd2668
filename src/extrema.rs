use num_complex::Complex64;

/// Strict interior minima, maxima, and zero crossings of a real sequence.
///
/// `indmin`/`indmax` hold interior indices `1 <= i <= len - 2` where the
/// sample is strictly below/above both neighbors; plateaus (equal non-zero
/// neighbors) are not extrema. `indzer` holds every interior sign change plus
/// one index per run of exact zeros, sorted ascending with duplicates
/// removed. See SPEC_FULL.md §4.1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub indmin: Vec<usize>,
    pub indmax: Vec<usize>,
    pub indzer: Vec<usize>,
}

impl Extrema {
    pub fn count(&self) -> usize {
        self.indmin.len() + self.indmax.len()
    }
}

/// Round-half-to-even, the convention this crate picked for collapsing a run
/// of exact zeros to its midpoint index (SPEC_FULL.md §4.1, §9). The
/// reference implementation rounds half-away-from-zero instead; the two only
/// disagree when a zero run has even length starting at an even index.
fn round_half_to_even(x: f64) -> usize {
    let floor = x.floor();
    let frac = x - floor;
    let rounded = if frac < 0.5 {
        floor
    } else if frac > 0.5 {
        floor + 1.0
    } else if (floor as i64).rem_euclid(2) == 0 {
        floor
    } else {
        floor + 1.0
    };
    rounded as usize
}

/// Detect strict local minima/maxima and zero crossings of `v`. Returns empty
/// vectors for both extrema kinds if `v` has fewer than 3 samples.
pub fn find_extrema(v: &[f64]) -> Extrema {
    let m = v.len();
    let mut indmin = Vec::new();
    let mut indmax = Vec::new();
    for i in 1..m.saturating_sub(1) {
        if v[i - 1] > v[i] && v[i] < v[i + 1] {
            indmin.push(i);
        } else if v[i - 1] < v[i] && v[i] > v[i + 1] {
            indmax.push(i);
        }
    }

    let mut indzer: Vec<usize> = Vec::new();
    for i in 0..m.saturating_sub(1) {
        if v[i] * v[i + 1] < 0.0 {
            indzer.push(i);
        }
    }

    let mut run_start: Option<usize> = None;
    for i in 0..m {
        if v[i] == 0.0 {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else if let Some(start) = run_start.take() {
            indzer.push(round_half_to_even((start + (i - 1)) as f64 / 2.0));
        }
    }
    if let Some(start) = run_start {
        indzer.push(round_half_to_even((start + (m - 1)) as f64 / 2.0));
    }

    indzer.sort_unstable();
    indzer.dedup();

    Extrema {
        indmin,
        indmax,
        indzer,
    }
}

/// Whether a candidate still has enough structure to keep sifting: at least
/// three interior extrema on its real part. Both the sift driver and the
/// outer decomposition loop use this as their pre-check, since mirroring
/// fewer than three extrema is fatal (SPEC_FULL.md §4.1, §4.6, §4.7).
pub fn has_enough_structure(candidate: &[Complex64]) -> bool {
    let re: Vec<f64> = candidate.iter().map(|c| c.re).collect();
    find_extrema(&re).count() >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_extrema() {
        let v = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        let e = find_extrema(&v);
        assert_eq!(e.indmax, vec![1, 5]);
        assert_eq!(e.indmin, vec![3]);
    }

    #[test]
    fn plateaus_are_not_extrema() {
        let v = [0.0, 1.0, 1.0, 1.0, 0.0];
        let e = find_extrema(&v);
        assert!(e.indmax.is_empty());
        assert!(e.indmin.is_empty());
    }

    #[test]
    fn short_sequence_has_no_extrema() {
        let e = find_extrema(&[1.0, 2.0]);
        assert!(e.indmin.is_empty());
        assert!(e.indmax.is_empty());
    }

    #[test]
    fn isolated_zero_and_sign_change_both_counted() {
        let v = [1.0, 0.0, -1.0, 1.0];
        let e = find_extrema(&v);
        // isolated zero at index 1 (neighbors straddling it multiply to 0,
        // not < 0, so it is only picked up by the exact-zero-run pass), plus
        // a genuine sign change between indices 2 and 3.
        assert_eq!(e.indzer, vec![1, 2]);
    }

    #[test]
    fn sign_change_without_zero_sample() {
        let v = [1.0, -1.0, 1.0];
        let e = find_extrema(&v);
        assert_eq!(e.indzer, vec![0, 1]);
    }

    #[test]
    fn zero_run_midpoint_tie() {
        // run occupies indices 1..=4 (even length, even start): round-half-to-even
        // picks 2 (the midpoint is exactly 2.5).
        let v = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let e = find_extrema(&v);
        assert_eq!(e.indzer, vec![2]);
    }

    #[test]
    fn zero_run_midpoint_rounds_to_odd_when_that_is_even_neighbor() {
        // run occupies indices 0..=3: midpoint 1.5 rounds to 2 (even).
        let v = [0.0, 0.0, 0.0, 0.0, 1.0];
        let e = find_extrema(&v);
        assert_eq!(e.indzer, vec![2]);
    }
}
