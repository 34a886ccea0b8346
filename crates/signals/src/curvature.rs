//! Discrete curvature — repeated one-sided finite differences over the
//! newest few samples of a price sequence.

/// One-sided, second-order-accurate first difference.
///
/// For `n >= 3` input samples produces `n - 2` outputs where
/// `out[i] = (3*seq[i] - 4*seq[i+1] + seq[i+2]) / 2`. Applied to an
/// arithmetic progression the output is constant. Shorter inputs
/// produce an empty vector.
#[must_use]
pub fn first_diff(seq: &[f64]) -> Vec<f64> {
    if seq.len() < 3 {
        return Vec::new();
    }
    seq.windows(3)
        .map(|w| (3.0 * w[0] - 4.0 * w[1] + w[2]) / 2.0)
        .collect()
}

/// Second finite difference of the newest five samples.
///
/// Restricts `seq` to its first five elements and differences twice;
/// `None` while fewer than five samples exist. For samples of a
/// quadratic with unit step the result equals the discrete second
/// derivative.
#[must_use]
pub fn curvature(seq: &[f64]) -> Option<f64> {
    let head = seq.get(..5)?;
    let inner = first_diff(head);
    first_diff(&inner).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_diff_needs_three_samples() {
        assert!(first_diff(&[]).is_empty());
        assert!(first_diff(&[1.0, 2.0]).is_empty());
        assert_eq!(first_diff(&[1.0, 2.0, 3.0]).len(), 1);
    }

    #[test]
    fn first_diff_of_arithmetic_progression_is_constant() {
        let out = first_diff(&[2.0, 5.0, 8.0, 11.0, 14.0]);
        for value in out {
            assert!((value - (-3.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn linear_sequence_has_zero_curvature() {
        assert_eq!(curvature(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(0.0));
    }

    #[test]
    fn quadratic_sequence_matches_discrete_second_derivative() {
        let curv = curvature(&[1.0, 4.0, 9.0, 16.0, 25.0]).unwrap();
        assert!((curv - 2.0).abs() < 1e-12);
    }

    #[test]
    fn undefined_below_five_samples() {
        assert_eq!(curvature(&[]), None);
        assert_eq!(curvature(&[1.0, 2.0, 3.0, 4.0]), None);
    }

    #[test]
    fn only_the_newest_five_samples_matter() {
        let short = curvature(&[1.0, 4.0, 9.0, 16.0, 25.0]).unwrap();
        let long = curvature(&[1.0, 4.0, 9.0, 16.0, 25.0, 1000.0, -500.0]).unwrap();
        assert!((short - long).abs() < 1e-12);
    }
}
