//! Small dense solvers for the normal equations of the estimators.

use ndarray::{Array1, Array2};

const JACOBI_MAX_SWEEPS: usize = 100;
const PINV_RELATIVE_CUTOFF: f64 = 1e-10;

/// Solve a symmetric positive-definite system `A x = b` via Cholesky.
/// Retries once with a small ridge on the diagonal if `A` is not numerically PD.
pub fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return None;
    }

    let l = match cholesky_factor(a) {
        Some(l) => l,
        None => {
            let mut regularized = a.clone();
            let ridge = 1e-8 * a.diag().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
            for k in 0..n {
                regularized[[k, k]] += ridge.max(f64::EPSILON);
            }
            cholesky_factor(&regularized)?
        }
    };

    // L y = b
    let mut y = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

fn cholesky_factor(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
/// Returns eigenvalues and the matrix whose columns are the eigenvectors.
pub fn symmetric_eigen(a: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut m = a.clone();
    let mut v = Array2::<f64>::eye(n);
    let scale = a.iter().map(|x| x * x).sum::<f64>().max(f64::MIN_POSITIVE);

    for _ in 0..JACOBI_MAX_SWEEPS {
        let mut off_diagonal = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off_diagonal += m[[p, q]] * m[[p, q]];
            }
        }
        if off_diagonal <= 1e-30 * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = m[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (m[[q, q]] - m[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let mkp = m[[k, p]];
                    let mkq = m[[k, q]];
                    m[[k, p]] = c * mkp - s * mkq;
                    m[[k, q]] = s * mkp + c * mkq;
                }
                for k in 0..n {
                    let mpk = m[[p, k]];
                    let mqk = m[[q, k]];
                    m[[p, k]] = c * mpk - s * mqk;
                    m[[q, k]] = s * mpk + c * mqk;
                }
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (m.diag().to_owned(), v)
}

/// Moore-Penrose pseudo-inverse of a symmetric positive semi-definite matrix.
/// Eigenvalues below a relative cutoff are treated as zero, which yields the
/// minimum-norm solution when applied to rank-deficient normal equations.
pub fn pseudo_inverse_symmetric(a: &Array2<f64>) -> Array2<f64> {
    let n = a.nrows();
    let (eigenvalues, eigenvectors) = symmetric_eigen(a);
    let largest = eigenvalues.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let cutoff = largest * PINV_RELATIVE_CUTOFF;

    let mut pinv = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        if lambda <= cutoff || lambda == 0.0 {
            continue;
        }
        let column = eigenvectors.column(k);
        for i in 0..n {
            for j in 0..n {
                pinv[[i, j]] += column[i] * column[j] / lambda;
            }
        }
    }
    pinv
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_cholesky_solve() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let b = array![2.0, 1.0];
        let x = cholesky_solve(&a, &b).unwrap();
        let back = a.dot(&x);
        assert_close(back[0], 2.0);
        assert_close(back[1], 1.0);
    }

    #[test]
    fn test_cholesky_rejects_shape_mismatch() {
        let a = array![[1.0, 0.0], [0.0, 1.0]];
        assert!(cholesky_solve(&a, &array![1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn test_symmetric_eigen_reconstructs() {
        let a = array![[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 4.0]];
        let (values, vectors) = symmetric_eigen(&a);
        for k in 0..3 {
            let v = vectors.column(k).to_owned();
            let av = a.dot(&v);
            for i in 0..3 {
                assert_close(av[i], values[k] * v[i]);
            }
        }
    }

    #[test]
    fn test_pseudo_inverse_of_rank_one() {
        // u u^T with u = (1, 2): pinv = u u^T / |u|^4
        let a = array![[1.0, 2.0], [2.0, 4.0]];
        let pinv = pseudo_inverse_symmetric(&a);
        assert_close(pinv[[0, 0]], 1.0 / 25.0);
        assert_close(pinv[[0, 1]], 2.0 / 25.0);
        assert_close(pinv[[1, 1]], 4.0 / 25.0);
    }

    #[test]
    fn test_pseudo_inverse_of_zero_matrix() {
        let pinv = pseudo_inverse_symmetric(&Array2::zeros((3, 3)));
        assert!(pinv.iter().all(|v| *v == 0.0));
    }
}
