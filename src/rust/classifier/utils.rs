use ndarray::ArrayView1;
use sprs::CsVec;

/// Builds an L2-normalised sparse vector from unsorted `(index, value)` pairs.
/// A vector with zero norm is returned as-is (all zeros).
pub(crate) fn normalized_sparse(dim: usize, mut entries: Vec<(usize, f64)>) -> CsVec<f64> {
    entries.sort_unstable_by_key(|&(i, _)| i);
    let norm: f64 = entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt();
    let (indices, data): (Vec<usize>, Vec<f64>) = if norm > 1e-12 {
        entries.into_iter().map(|(i, v)| (i, v / norm)).unzip()
    } else {
        entries.into_iter().unzip()
    };
    CsVec::new(dim, indices, data)
}

/// Dot product of a sparse row against a dense weight row.
pub(crate) fn sparse_dot(x: &CsVec<f64>, w: ArrayView1<'_, f64>) -> f64 {
    x.iter().map(|(i, &v)| v * w[i]).sum()
}

pub(crate) fn squared_norm(x: &CsVec<f64>) -> f64 {
    x.iter().map(|(_, &v)| v * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalized_sparse_has_unit_norm() {
        let v = normalized_sparse(5, vec![(3, 4.0), (0, 3.0)]);
        assert_eq!(v.indices(), &[0, 3]);
        assert!((squared_norm(&v) - 1.0).abs() < 1e-12);
        assert!((v.data()[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let v = normalized_sparse(3, Vec::new());
        assert_eq!(v.nnz(), 0);
        assert_eq!(squared_norm(&v), 0.0);
    }

    #[test]
    fn test_sparse_dot() {
        let v = normalized_sparse(3, vec![(0, 1.0), (2, 1.0)]);
        let w = array![2.0, 5.0, 2.0];
        let expected = 4.0 / 2f64.sqrt();
        assert!((sparse_dot(&v, w.view()) - expected).abs() < 1e-12);
    }
}
