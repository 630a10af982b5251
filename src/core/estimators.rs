//! Estimators fitted by the trainer and persisted inside model artifacts.

use crate::core::linalg::{cholesky_solve, pseudo_inverse_symmetric};
use crate::domain::model::{CLASSIFICATION_MODEL, REGRESSION_MODEL};
use crate::utils::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Ordinary least squares with intercept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fits on centered data so the intercept is never shrunk. Rank-deficient
    /// designs resolve to the minimum-norm coefficient vector.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>) -> Result<Self> {
        check_inputs(REGRESSION_MODEL, x, y)?;

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ForecastError::training(REGRESSION_MODEL, "no rows to fit"))?;
        let y_mean = y
            .mean()
            .ok_or_else(|| ForecastError::training(REGRESSION_MODEL, "no rows to fit"))?;

        let xc = x - &x_mean;
        let yc = y - y_mean;
        let gram = xc.t().dot(&xc);
        let moment = xc.t().dot(&yc);

        let coefficients = pseudo_inverse_symmetric(&gram).dot(&moment);
        let intercept = y_mean - x_mean.dot(&coefficients);

        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ForecastError::training(
                REGRESSION_MODEL,
                "least squares produced non-finite coefficients",
            ));
        }

        Ok(Self {
            intercept,
            coefficients: coefficients.to_vec(),
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::prediction(format!(
                "regression expects {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, c)| x * c)
                .sum::<f64>())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticOptions {
    /// Inverse L2 regularization strength.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for LogisticOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-8,
        }
    }
}

/// Binary logistic regression over internally standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogisticRegression {
    pub feature_means: Vec<f64>,
    pub feature_scales: Vec<f64>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub c: f64,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

impl LogisticRegression {
    /// Newton-Raphson on the L2-penalized log-loss, intercept unpenalized.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, options: LogisticOptions) -> Result<Self> {
        check_inputs(CLASSIFICATION_MODEL, x, y)?;

        if !(options.c > 0.0 && options.c.is_finite()) {
            return Err(ForecastError::training(
                CLASSIFICATION_MODEL,
                format!("regularization C must be positive, got {}", options.c),
            ));
        }
        if let Some(label) = y.iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(ForecastError::training(
                CLASSIFICATION_MODEL,
                format!("labels must be 0 or 1, found {}", label),
            ));
        }
        let positives = y.iter().filter(|v| **v == 1.0).count();
        if positives == 0 || positives == y.len() {
            return Err(ForecastError::training(
                CLASSIFICATION_MODEL,
                "need both rain and no-rain rows, found a single class",
            ));
        }

        let n_samples = x.nrows();
        let n_features = x.ncols();

        let means = x
            .mean_axis(Axis(0))
            .ok_or_else(|| ForecastError::training(CLASSIFICATION_MODEL, "no rows to fit"))?;
        let scales = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });

        // Design matrix: leading intercept column, then standardized features.
        let mut design = Array2::<f64>::ones((n_samples, n_features + 1));
        for i in 0..n_samples {
            for j in 0..n_features {
                design[[i, j + 1]] = (x[[i, j]] - means[j]) / scales[j];
            }
        }

        let mut penalty = Array1::<f64>::ones(n_features + 1);
        penalty[0] = 0.0;

        let objective = |theta: &Array1<f64>| -> f64 {
            let z = design.dot(theta);
            let loss: f64 = z
                .iter()
                .zip(y.iter())
                .map(|(zi, yi)| softplus(*zi) - yi * zi)
                .sum();
            let ridge: f64 = theta
                .iter()
                .zip(penalty.iter())
                .map(|(t, p)| p * t * t)
                .sum();
            options.c * loss + 0.5 * ridge
        };

        let mut theta = Array1::<f64>::zeros(n_features + 1);
        let mut converged = false;

        for iteration in 0..options.max_iter {
            let p = design.dot(&theta).mapv(sigmoid);
            let residual = &p - y;
            let gradient = design.t().dot(&residual) * options.c + &penalty * &theta;

            let weights = p.mapv(|pi| pi * (1.0 - pi));
            let weighted = &design * &weights.view().insert_axis(Axis(1));
            let mut hessian = design.t().dot(&weighted) * options.c;
            for k in 0..=n_features {
                hessian[[k, k]] += penalty[k];
            }

            let step = cholesky_solve(&hessian, &gradient).ok_or_else(|| {
                ForecastError::training(CLASSIFICATION_MODEL, "Hessian is not positive definite")
            })?;

            let current = objective(&theta);
            let mut step_size = 1.0;
            let mut candidate = &theta - &(&step * step_size);
            while objective(&candidate) > current && step_size > 1e-10 {
                step_size *= 0.5;
                candidate = &theta - &(&step * step_size);
            }

            let change = step.iter().fold(0.0_f64, |acc, s| acc.max(s.abs())) * step_size;
            theta = candidate;

            if theta.iter().any(|t| !t.is_finite()) {
                return Err(ForecastError::training(
                    CLASSIFICATION_MODEL,
                    "optimizer diverged to non-finite parameters",
                ));
            }
            if change < options.tol {
                tracing::debug!("Logistic regression converged after {} iterations", iteration + 1);
                converged = true;
                break;
            }
        }

        if !converged {
            tracing::warn!(
                "Logistic regression did not reach tol={} within {} iterations",
                options.tol,
                options.max_iter
            );
        }

        Ok(Self {
            feature_means: means.to_vec(),
            feature_scales: scales.to_vec(),
            coefficients: theta.iter().skip(1).copied().collect(),
            intercept: theta[0],
            c: options.c,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Probability of the positive (rain) class.
    pub fn predict_proba_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(ForecastError::prediction(format!(
                "classification expects {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        let z = self.intercept
            + row
                .iter()
                .zip(&self.feature_means)
                .zip(&self.feature_scales)
                .zip(&self.coefficients)
                .map(|(((x, mean), scale), coef)| coef * (x - mean) / scale)
                .sum::<f64>();
        Ok(sigmoid(z))
    }

    pub fn is_consistent(&self) -> bool {
        let n = self.coefficients.len();
        self.feature_means.len() == n
            && self.feature_scales.len() == n
            && self.feature_scales.iter().all(|s| *s > 0.0 && s.is_finite())
            && self.coefficients.iter().all(|c| c.is_finite())
            && self.intercept.is_finite()
    }
}

fn check_inputs(model: &str, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ForecastError::training(model, "no rows to fit"));
    }
    if x.nrows() != y.len() {
        return Err(ForecastError::training(
            model,
            format!("{} feature rows but {} targets", x.nrows(), y.len()),
        ));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(ForecastError::training(model, "input contains non-finite values"));
    }
    Ok(())
}
