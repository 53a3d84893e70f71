// Vector arithmetic shared by anchor resolution, article vectorization and
// the polarity scorer.
//
// Accumulation happens in f64 regardless of the storage precision of the
// model, so a mean over f32 rows and a mean over already-averaged f64 rows
// go through the same code.

use crate::error::VectorError;

/// Element-wise mean of a set of equally sized rows.
///
/// Returns `None` for an empty set.
pub fn mean<T>(rows: &[&[T]]) -> Option<Vec<f64>>
where
    T: Copy + Into<f64>,
{
    let first = rows.first()?;
    let mut sum = vec![0.0_f64; first.len()];

    for row in rows {
        debug_assert_eq!(row.len(), sum.len(), "rows must share one dimensionality");
        for (acc, &val) in sum.iter_mut().zip(row.iter()) {
            *acc += val.into();
        }
    }

    let n = rows.len() as f64;
    for val in &mut sum {
        *val /= n;
    }

    Some(sum)
}

/// Widen a stored f32 row into the f64 working precision.
pub fn widen(row: &[f32]) -> Vec<f64> {
    row.iter().map(|&v| f64::from(v)).collect()
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Cosine similarity in [-1, 1].
///
/// A zero-norm operand is an error, never 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mag_a = norm(a);
    let mag_b = norm(b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return Err(VectorError::ZeroNorm);
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let sim = dot / (mag_a * mag_b);

    if !sim.is_finite() {
        return Err(VectorError::NonFinite);
    }

    // Rounding can push parallel vectors a hair past 1.0
    Ok(sim.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_single_row_is_the_row() {
        let row = [1.0_f32, 2.0, 3.0];
        let m = mean(&[&row[..]]).unwrap();
        assert_eq!(m, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mean_of_two_rows() {
        let a = [1.0_f64, 0.0, 0.0];
        let b = [0.0_f64, 1.0, 0.0];
        let m = mean(&[&a[..], &b[..]]).unwrap();
        assert!((m[0] - 0.5).abs() < f64::EPSILON);
        assert!((m[1] - 0.5).abs() < f64::EPSILON);
        assert!(m[2].abs() < f64::EPSILON);
    }

    #[test]
    fn mean_of_nothing_is_none() {
        let rows: [&[f32]; 0] = [];
        assert!(mean(&rows).is_none());
    }

    #[test]
    fn cosine_identical() {
        let a = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-10);
    }

    #[test]
    fn cosine_opposite_is_negative_one() {
        // No clamping to [0, 1] here: direction matters for polarity.
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((sim + 1.0).abs() < 1e-10);
    }

    #[test]
    fn cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).unwrap().abs() < 1e-10);
    }

    #[test]
    fn cosine_zero_vector_is_an_error() {
        let a = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&a, &b), Err(VectorError::ZeroNorm));
        assert_eq!(cosine_similarity(&b, &a), Err(VectorError::ZeroNorm));
    }

    #[test]
    fn cosine_mismatched_dimensions_is_an_error() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(
            cosine_similarity(&a, &b),
            Err(VectorError::DimensionMismatch { left: 2, right: 3 })
        );
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vec![1.0, 3.0, -2.0, 0.5];
        let b = vec![2.0, -1.0, 4.0, 0.0];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-10);
    }
}
