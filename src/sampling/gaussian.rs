//! Normally distributed samples via the Box–Muller transform.

use std::f64::consts::PI;

use rand::Rng;

/// Draw from `Normal(mean, std_dev)`.
///
/// A zero standard deviation returns `mean` without consuming randomness.
pub fn gaussian(mean: f64, std_dev: f64, rng: &mut impl Rng) -> f64 {
    if std_dev == 0.0 {
        return mean;
    }
    // 1 - [0, 1) keeps u1 in (0, 1] so ln(u1) is finite.
    let u1 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    mean + z0 * std_dev
}
