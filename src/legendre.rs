//! Gauss-Legendre node and weight tables for arbitrary degree.
//!
//! Nodes are the roots of the Legendre polynomial, refined by Newton's
//! method from the usual cosine starting guesses; weights follow from the
//! derivative at each root. Computed tables are cached per degree behind
//! a mutex, since the comparison engine asks for the same degree on every
//! invocation.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref TABLES: Mutex<HashMap<usize, Arc<(Vec<f64>, Vec<f64>)>>> =
        Mutex::new(HashMap::new());
}

/// Value and derivative of the Legendre polynomial `P_deg` at `x`,
/// via the three-term recurrence
/// `(j+1) P_{j+1}(x) = (2j+1) x P_j(x) - j P_{j-1}(x)`.
fn legendre_pair(deg: usize, x: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 0..deg {
        let p3 = p2;
        p2 = p1;
        p1 = ((2 * j + 1) as f64 * x * p2 - j as f64 * p3) / (j + 1) as f64;
    }
    // valid only away from the endpoints, which is where all roots live
    let dp = deg as f64 * (x * p1 - p2) / (x * x - 1.0);
    (p1, dp)
}

fn compute(deg: usize) -> (Vec<f64>, Vec<f64>) {
    debug_assert!(deg >= 1);
    let mut nodes = vec![0.0; deg];
    let mut weights = vec![0.0; deg];

    // roots come in symmetric pairs, so only the lower half is refined
    let half = (deg + 1) / 2;
    for i in 0..half {
        let mut z = (PI * (i as f64 + 0.75) / (deg as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_pair(deg, z);
            let z1 = z;
            z = z1 - p / dp;
            if (z - z1).abs() <= 1e-14 {
                break;
            }
        }
        let (_, dp) = legendre_pair(deg, z);
        let w = 2.0 / ((1.0 - z * z) * dp * dp);
        nodes[i] = -z;
        nodes[deg - 1 - i] = z;
        weights[i] = w;
        weights[deg - 1 - i] = w;
    }

    (nodes, weights)
}

/// Nodes and weights for the degree-`deg` rule on `[-1, 1]`, in ascending
/// node order. Tables are shared; repeated calls are a map lookup.
pub(crate) fn leggauss(deg: usize) -> Arc<(Vec<f64>, Vec<f64>)> {
    let mut cache = TABLES.lock().unwrap();
    cache
        .entry(deg)
        .or_insert_with(|| Arc::new(compute(deg)))
        .clone()
}
