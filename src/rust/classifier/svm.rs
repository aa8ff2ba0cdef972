use std::collections::BTreeSet;

use log::{info, warn};
use ndarray::{Array2, ArrayViewMut1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sprs::CsVec;

use super::error::ClassifierError;
use super::utils::{sparse_dot, squared_norm};

/// Hyperparameters of the linear support vector classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Regularization strength (inverse); larger values fit the data harder
    pub c: f64,
    /// Stopping tolerance on the projected gradient spread
    pub tol: f64,
    /// Maximum passes over the training set per binary problem
    pub max_iter: usize,
    /// Seed for the coordinate permutation
    pub seed: u64,
    /// Value of the constant feature appended to every sample
    pub intercept_scaling: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 1000,
            seed: 42,
            intercept_scaling: 1.0,
        }
    }
}

impl SvmConfig {
    pub(crate) fn validate(&self) -> Result<(), ClassifierError> {
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if self.tol.is_nan() || self.tol <= 0.0 {
            return Err(ClassifierError::ValidationError(format!(
                "Tolerance must be positive, got {}",
                self.tol
            )));
        }
        if self.max_iter == 0 {
            return Err(ClassifierError::ValidationError("max_iter must be at least 1".into()));
        }
        Ok(())
    }
}

/// One-vs-rest linear SVM (L2 penalty, squared hinge loss) fitted by dual
/// coordinate descent.
///
/// With two labels a single hyperplane is stored and a positive decision value
/// selects `labels[1]`; otherwise there is one hyperplane per label and the
/// largest decision value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvc {
    config: SvmConfig,
    labels: Vec<String>,
    weights: Array2<f64>,
    intercepts: Vec<f64>,
}

impl LinearSvc {
    /// Fits the classifier on pre-vectorized samples.
    ///
    /// # Errors
    /// - `ValidationError` for bad hyperparameters or mismatched inputs
    /// - `FitError` when fewer than two distinct labels are present
    pub fn fit(
        config: SvmConfig,
        samples: &[CsVec<f64>],
        targets: &[String],
    ) -> Result<Self, ClassifierError> {
        config.validate()?;
        if samples.len() != targets.len() {
            return Err(ClassifierError::ValidationError(format!(
                "Got {} samples but {} labels",
                samples.len(),
                targets.len()
            )));
        }
        let n_features = samples.first().map(|s| s.dim()).ok_or_else(|| {
            ClassifierError::FitError("Cannot fit classifier on an empty training set".into())
        })?;
        if samples.iter().any(|s| s.dim() != n_features) {
            return Err(ClassifierError::ValidationError(
                "All samples must share one feature space".into(),
            ));
        }

        let labels: Vec<String> = targets
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if labels.len() < 2 {
            return Err(ClassifierError::FitError(format!(
                "The number of classes has to be greater than one; got {}",
                labels.len()
            )));
        }

        let positives: Vec<&String> = if labels.len() == 2 {
            vec![&labels[1]]
        } else {
            labels.iter().collect()
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        // The bias is solved as one extra weight column.
        let mut weights = Array2::<f64>::zeros((positives.len(), n_features + 1));
        for (row, positive) in positives.iter().enumerate() {
            let y: Vec<f64> = targets
                .iter()
                .map(|t| if t == *positive { 1.0 } else { -1.0 })
                .collect();
            let iterations = solve_dual(&config, samples, &y, weights.row_mut(row), &mut rng);
            if iterations >= config.max_iter {
                warn!(
                    "Solver for label '{}' reached max_iter={} without converging",
                    positive, config.max_iter
                );
            } else {
                info!("Label '{}' converged after {} iterations", positive, iterations);
            }
        }

        let intercepts = weights
            .column(n_features)
            .iter()
            .map(|w| w * config.intercept_scaling)
            .collect();
        let weights = weights.slice(ndarray::s![.., ..n_features]).to_owned();

        Ok(Self {
            config,
            labels,
            weights,
            intercepts,
        })
    }

    /// Raw decision values, one per stored hyperplane.
    pub fn decision_function(&self, x: &CsVec<f64>) -> Result<Vec<f64>, ClassifierError> {
        if x.dim() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Sample has {} features, model expects {}",
                x.dim(),
                self.n_features()
            )));
        }
        Ok(self
            .weights
            .rows()
            .into_iter()
            .zip(&self.intercepts)
            .map(|(w, b)| sparse_dot(x, w) + b)
            .collect())
    }

    pub fn predict(&self, x: &CsVec<f64>) -> Result<&str, ClassifierError> {
        let scores = self.decision_function(x)?;
        let index = if self.labels.len() == 2 {
            usize::from(scores[0] > 0.0)
        } else {
            scores
                .iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (i, &s)| if s > best.1 { (i, s) } else { best })
                .0
        };
        Ok(self.labels[index].as_str())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn config(&self) -> &SvmConfig {
        &self.config
    }
}

/// Dual coordinate descent for the L2-regularized squared-hinge SVM with an
/// augmented bias feature. Writes the primal weights into `w` and returns the
/// number of outer iterations performed.
fn solve_dual(
    config: &SvmConfig,
    samples: &[CsVec<f64>],
    y: &[f64],
    mut w: ArrayViewMut1<'_, f64>,
    rng: &mut StdRng,
) -> usize {
    let l = samples.len();
    let bias_index = w.len() - 1;
    let bias = config.intercept_scaling;
    let diag = 0.5 / config.c;

    let qd: Vec<f64> = samples
        .iter()
        .map(|x| diag + squared_norm(x) + bias * bias)
        .collect();
    let mut alpha = vec![0.0f64; l];
    let mut index: Vec<usize> = (0..l).collect();
    let mut active_size = l;
    let mut pg_max_old = f64::INFINITY;

    let mut iter = 0;
    while iter < config.max_iter {
        let mut pg_max_new = f64::NEG_INFINITY;
        let mut pg_min_new = f64::INFINITY;

        for i in 0..active_size {
            let j = rng.gen_range(i..active_size);
            index.swap(i, j);
        }

        let mut s = 0;
        while s < active_size {
            let i = index[s];
            let x = &samples[i];
            let yi = y[i];

            let wx = sparse_dot(x, w.view()) + w[bias_index] * bias;
            let g = yi * wx - 1.0 + alpha[i] * diag;

            let mut pg = 0.0;
            if alpha[i] == 0.0 {
                if g > pg_max_old {
                    active_size -= 1;
                    index.swap(s, active_size);
                    continue;
                } else if g < 0.0 {
                    pg = g;
                }
            } else {
                pg = g;
            }

            pg_max_new = pg_max_new.max(pg);
            pg_min_new = pg_min_new.min(pg);

            if pg.abs() > 1e-12 {
                let alpha_old = alpha[i];
                alpha[i] = (alpha[i] - g / qd[i]).max(0.0);
                let d = (alpha[i] - alpha_old) * yi;
                for (k, &v) in x.iter() {
                    w[k] += d * v;
                }
                w[bias_index] += d * bias;
            }
            s += 1;
        }

        iter += 1;

        if pg_max_new - pg_min_new <= config.tol {
            if active_size == l {
                break;
            }
            active_size = l;
            pg_max_old = f64::INFINITY;
            continue;
        }

        pg_max_old = if pg_max_new <= 0.0 { f64::INFINITY } else { pg_max_new };
    }

    iter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::utils::normalized_sparse;

    fn sample(dim: usize, entries: &[(usize, f64)]) -> CsVec<f64> {
        normalized_sparse(dim, entries.to_vec())
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_binary_separable() {
        let xs = vec![
            sample(2, &[(0, 1.0)]),
            sample(2, &[(0, 1.0), (1, 0.1)]),
            sample(2, &[(1, 1.0)]),
            sample(2, &[(1, 1.0), (0, 0.1)]),
        ];
        let ys = labels(&["food", "food", "travel", "travel"]);
        let svm = LinearSvc::fit(SvmConfig::default(), &xs, &ys).unwrap();

        assert_eq!(svm.labels(), &["food".to_string(), "travel".to_string()]);
        assert_eq!(svm.predict(&sample(2, &[(0, 1.0)])).unwrap(), "food");
        assert_eq!(svm.predict(&sample(2, &[(1, 1.0)])).unwrap(), "travel");
        assert_eq!(svm.decision_function(&xs[0]).unwrap().len(), 1);
    }

    #[test]
    fn test_multiclass_one_vs_rest() {
        let xs = vec![
            sample(3, &[(0, 1.0)]),
            sample(3, &[(1, 1.0)]),
            sample(3, &[(2, 1.0)]),
        ];
        let ys = labels(&["bills", "food", "travel"]);
        let svm = LinearSvc::fit(SvmConfig::default(), &xs, &ys).unwrap();

        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(svm.predict(x).unwrap(), y);
        }
        assert_eq!(svm.decision_function(&xs[0]).unwrap().len(), 3);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let xs = vec![
            sample(3, &[(0, 1.0), (1, 0.5)]),
            sample(3, &[(1, 1.0)]),
            sample(3, &[(2, 1.0), (0, 0.2)]),
            sample(3, &[(2, 0.7), (1, 0.7)]),
        ];
        let ys = labels(&["a", "b", "c", "b"]);
        let first = LinearSvc::fit(SvmConfig::default(), &xs, &ys).unwrap();
        let second = LinearSvc::fit(SvmConfig::default(), &xs, &ys).unwrap();
        assert_eq!(first.weights, second.weights);
        assert_eq!(first.intercepts, second.intercepts);
    }

    #[test]
    fn test_single_label_rejected() {
        let xs = vec![sample(1, &[(0, 1.0)])];
        let result = LinearSvc::fit(SvmConfig::default(), &xs, &labels(&["food"]));
        assert!(matches!(result, Err(ClassifierError::FitError(_))));
    }

    #[test]
    fn test_dimension_mismatch_on_predict() {
        let xs = vec![sample(2, &[(0, 1.0)]), sample(2, &[(1, 1.0)])];
        let svm = LinearSvc::fit(SvmConfig::default(), &xs, &labels(&["a", "b"])).unwrap();
        let result = svm.decision_function(&sample(5, &[(4, 1.0)]));
        assert!(matches!(result, Err(ClassifierError::PredictionError(_))));
    }

    #[test]
    fn test_invalid_c() {
        let config = SvmConfig { c: 0.0, ..SvmConfig::default() };
        let xs = vec![sample(1, &[(0, 1.0)]), sample(1, &[])];
        let result = LinearSvc::fit(config, &xs, &labels(&["a", "b"]));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }
}
