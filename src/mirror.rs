use crate::error::EmdError;
use crate::extrema::find_extrema;

/// Extended minima/maxima positions and values, `nbsym` reflected points
/// added on each side of the interior extrema of `x`. See SPEC_FULL.md §4.2.
#[derive(Debug, Clone, PartialEq)]
pub struct MirroredExtrema {
    pub tmin: Vec<f64>,
    pub tmax: Vec<f64>,
    pub zmin: Vec<f64>,
    pub zmax: Vec<f64>,
}

/// Python-style slice: `start`/`end` may be negative (counted from the end,
/// as `-1` means "one past the last element"), and are clamped into range
/// rather than panicking on overshoot. This lets [`mirror_extrema`] port the
/// reference implementation's index arithmetic verbatim instead of
/// reinterpreting it.
fn py_slice(v: &[usize], start: isize, end: isize) -> Vec<usize> {
    let len = v.len() as isize;
    let norm = |i: isize| -> usize {
        let i = if i < 0 { len + i } else { i };
        i.clamp(0, len) as usize
    };
    let (s, e) = (norm(start), norm(end));
    if s >= e {
        Vec::new()
    } else {
        v[s..e].to_vec()
    }
}

fn reversed(mut v: Vec<usize>) -> Vec<usize> {
    v.reverse();
    v
}

fn gather(t: &[f64], idx: &[usize]) -> Vec<f64> {
    idx.iter().map(|&i| t[i]).collect()
}

fn mirror_about(pivot_t: f64, t_reflected: &[f64]) -> Vec<f64> {
    t_reflected.iter().map(|&tr| 2.0 * pivot_t - tr).collect()
}

/// Mirror the extrema of `x` about both endpoints, pairing timestamps from
/// `t` with reflected values taken from `z` (the companion sequence actually
/// being enveloped — equal to `x` in real mode, a rotated projection in
/// complex mode). Fails with [`EmdError::InsufficientExtrema`] if `x` has
/// fewer than three interior extrema, or if one of the two extrema kinds is
/// entirely absent (the reference implementation does not guard this second
/// case and would index out of bounds; this crate treats it the same as
/// "not enough extrema" since it is equally fatal to sifting the mode).
pub fn mirror_extrema(x: &[f64], t: &[f64], z: &[f64], nbsym: usize) -> Result<MirroredExtrema, EmdError> {
    let extrema = find_extrema(x);
    let (indmin, indmax) = (extrema.indmin, extrema.indmax);
    if indmin.len() + indmax.len() < 3 {
        return Err(EmdError::InsufficientExtrema);
    }
    if indmin.is_empty() || indmax.is_empty() {
        return Err(EmdError::InsufficientExtrema);
    }
    let lx = x.len() - 1;
    let nmax = indmax.len();
    let nmin = indmin.len();

    // --- left boundary ---
    let (mut lmax, mut lmin, mut lsym);
    if indmax[0] < indmin[0] {
        // first extremum is a maximum
        if x[0] > x[indmin[0]] {
            lmax = reversed(py_slice(&indmax, 1, nbsym as isize + 1));
            lmin = reversed(py_slice(&indmin, 0, nbsym as isize));
            lsym = indmax[0];
        } else {
            lmax = reversed(py_slice(&indmax, 1, nbsym as isize));
            lmin = reversed(py_slice(&indmin, 0, nbsym as isize - 1));
            // Open question (SPEC_FULL.md §9): the reference implementation
            // hard-codes index 1 here rather than 0.
            lmin.push(1);
            lsym = 1;
        }
    } else {
        // first extremum is a minimum
        if x[0] < x[indmax[0]] {
            lmax = reversed(py_slice(&indmax, 0, nbsym as isize));
            lmin = reversed(py_slice(&indmin, 1, nbsym as isize + 1));
            lsym = indmin[0];
        } else {
            // Open question (SPEC_FULL.md §9): the reference implementation
            // bounds both slices by `indmin.shape[0]`/`indmax.shape[0]`
            // asymmetrically here; preserved verbatim rather than "fixed".
            lmax = reversed(py_slice(&indmax, 0, (nmin as isize).min(nbsym as isize - 1)));
            lmax.push(1);
            lmin = reversed(py_slice(&indmin, 0, (nmax as isize).min(nbsym as isize)));
            lsym = 1;
        }
    }

    // --- right boundary ---
    let (mut rmax, mut rmin, mut rsym);
    if indmax[nmax - 1] < indmin[nmin - 1] {
        // last extremum is a minimum
        if x[lx] < x[indmax[nmax - 1]] {
            rmax = reversed(py_slice(&indmax, (nmax as isize - nbsym as isize + 1).max(1) - 1, nmax as isize));
            rmin = reversed(py_slice(&indmin, (nmin as isize - nbsym as isize).max(1) - 1, -1));
            rsym = indmin[nmin - 1];
        } else {
            let mut v = vec![lx];
            v.extend(reversed(py_slice(&indmax, (nmax as isize - nbsym as isize + 1).max(0), nmax as isize)));
            rmax = v;
            rmin = reversed(py_slice(&indmin, (nmin as isize - nbsym as isize).max(0), nmin as isize));
            rsym = lx;
        }
    } else {
        // last extremum is a maximum
        if x[lx] > x[indmin[nmin - 1]] {
            rmax = reversed(py_slice(&indmax, (nmax as isize - nbsym as isize - 1).max(0), -1));
            rmin = reversed(py_slice(&indmin, (nmin as isize - nbsym as isize).max(0), nmin as isize));
            rsym = indmax[nmax - 1];
        } else {
            rmax = reversed(py_slice(&indmax, (nmax as isize - nbsym as isize).max(0), nmax as isize));
            let mut v = vec![lx];
            v.extend(reversed(py_slice(&indmin, (nmin as isize - nbsym as isize + 1).max(0), nmin as isize)));
            rmin = v;
            rsym = lx;
        }
    }

    let mut tlmin = mirror_about(t[lsym], &gather(t, &lmin));
    let mut tlmax = mirror_about(t[lsym], &gather(t, &lmax));
    let mut trmin = mirror_about(t[rsym], &gather(t, &rmin));
    let mut trmax = mirror_about(t[rsym], &gather(t, &rmax));

    // post-check: widen the left window if it failed to extend past t[0]/t[1]
    if tlmin.first().copied().unwrap_or(f64::NEG_INFINITY) > t[0]
        || tlmax.first().copied().unwrap_or(f64::NEG_INFINITY) > t[1]
    {
        if lsym == indmax[0] {
            lmax = reversed(py_slice(&indmax, 0, nbsym as isize));
        } else {
            lmin = reversed(py_slice(&indmin, 0, nbsym as isize));
        }
        if lsym == 1 {
            return Err(EmdError::InternalInvariantViolated(
                "left mirror window failed to extend past the signal boundary even after widening".to_string(),
            ));
        }
        lsym = 1;
        tlmin = mirror_about(t[lsym], &gather(t, &lmin));
        tlmax = mirror_about(t[lsym], &gather(t, &lmax));
    }

    // post-check: widen the right window if it failed to extend past t[lx]
    if trmin.last().copied().unwrap_or(f64::INFINITY) < t[lx] || trmax.last().copied().unwrap_or(f64::INFINITY) < t[lx] {
        // Open question (SPEC_FULL.md §9): the reference implementation
        // compares `rsym` — an index into `x`/`t` — against `indmax.shape[0]`,
        // an element count. Preserved verbatim rather than "fixed" to
        // `indmax[nmax - 1]`.
        if rsym == nmax {
            rmax = reversed(py_slice(&indmax, (nmax as isize - nbsym as isize + 1).max(1), nmax as isize));
        } else {
            // Open question: also uses `indmax.shape[0]` to bound a slice of
            // `indmin`, asymmetric with the left post-check.
            rmin = reversed(py_slice(&indmin, (nmax as isize - nbsym as isize + 1).max(1), nmin as isize));
        }
        if rsym == lx {
            return Err(EmdError::InternalInvariantViolated(
                "right mirror window failed to extend past the signal boundary even after widening".to_string(),
            ));
        }
        rsym = lx;
        trmin = mirror_about(t[rsym], &gather(t, &rmin));
        trmax = mirror_about(t[rsym], &gather(t, &rmax));
    }

    let zlmin = gather(z, &lmin);
    let zlmax = gather(z, &lmax);
    let zrmin = gather(z, &rmin);
    let zrmax = gather(z, &rmax);

    let mut tmin = tlmin;
    tmin.extend(gather(t, &indmin));
    tmin.extend(trmin);

    let mut tmax = tlmax;
    tmax.extend(gather(t, &indmax));
    tmax.extend(trmax);

    let mut zmin = zlmin;
    zmin.extend(gather(z, &indmin));
    zmin.extend(zrmin);

    let mut zmax = zlmax;
    zmax.extend(gather(z, &indmax));
    zmax.extend(zrmax);

    Ok(MirroredExtrema { tmin, tmax, zmin, zmax })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linspace(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn rejects_fewer_than_three_extrema() {
        let x = [0.0, 1.0, 0.5];
        let t = linspace(3);
        let err = mirror_extrema(&x, &t, &x, 2).unwrap_err();
        assert!(matches!(err, EmdError::InsufficientExtrema));
    }

    #[test]
    fn mirrors_a_simple_sinusoid_shape() {
        let n = 20;
        let t = linspace(n);
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 3.0 * i as f64 / n as f64).sin())
            .collect();
        let m = mirror_extrema(&x, &t, &x, 2).unwrap();
        assert!(m.tmin.len() >= 3);
        assert!(m.tmax.len() >= 3);
        // the mirrored timestamps must bracket the real time axis on both sides
        assert!(m.tmin.first().unwrap() <= &t[0]);
        assert!(m.tmax.first().unwrap() <= &t[1]);
        assert!(m.tmin.last().unwrap() >= &t[n - 1]);
        assert!(m.tmax.last().unwrap() >= &t[n - 1]);
    }

    #[test]
    fn left_pivot_hardcoded_index_one() {
        // Construct a signal whose first extremum is a maximum with
        // x[0] <= x[indmin[0]], forcing the `lsym = 1` branch that hard-codes
        // index 1 rather than 0 (SPEC_FULL.md §4.2, §9).
        let x = [0.0, 1.0, -1.0, 0.5, -0.5, 0.8, -0.2];
        let t = linspace(x.len());
        let m = mirror_extrema(&x, &t, &x, 2).unwrap();
        assert!(!m.tmin.is_empty());
    }

    #[test]
    fn right_postcheck_matches_reference_branch() {
        // A short, asymmetric signal that forces the right post-check to
        // fire; this only asserts the call succeeds (doesn't panic / hit the
        // InternalInvariantViolated path), pinning down that the suspect
        // branch is at least reachable and well-defined.
        let x = [0.2, 0.9, -0.3, 0.6, -0.1, 0.95, -0.05, 0.4];
        let t = linspace(x.len());
        let m = mirror_extrema(&x, &t, &x, 3).unwrap();
        assert!(!m.tmax.is_empty());
    }

    #[test]
    fn mirror_symmetry_law() {
        // A signal symmetric about its midpoint should produce mirrored
        // minima/maxima sets symmetric about the same midpoint.
        let n = 21;
        let t = linspace(n);
        let mid = (n - 1) as f64 / 2.0;
        let x: Vec<f64> = (0..n)
            .map(|i| {
                let d = (i as f64 - mid).abs();
                (d * 0.6).cos()
            })
            .collect();
        let m = mirror_extrema(&x, &t, &x, 2).unwrap();
        let reflect = |ts: &[f64]| -> Vec<f64> { ts.iter().rev().map(|&v| 2.0 * mid - v).collect() };
        // the interior portion (skipping the mirrored tails) should itself be symmetric
        let interior_min: Vec<f64> = find_extrema(&x).indmin.iter().map(|&i| t[i]).collect();
        assert_eq!(interior_min, reflect(&interior_min));
    }
}
