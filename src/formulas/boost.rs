//! Boost materials.
//!
//! Stocked AI cores, hardware, real estate and robots multiply a
//! division's production:
//!
//! ```text
//! mult = (Π (1 + 0.002 q_i)^c_i)^0.73
//! ```
//!
//! Maximizing it under a warehouse budget `Σ s_i q_i = S` has the
//! Lagrangian solution
//!
//! ```text
//! q_i = c_i (S + 500 Σs) / (Σc s_i) - 500
//! ```
//!
//! over the set of materials worth stocking. A material whose optimum is
//! negative is dominated; it is fixed at zero and the rest re-solved.

/// Warehouse space per unit, in `[ai cores, hardware, real estate, robots]` order.
pub const BOOST_MATERIAL_SIZES: [f64; 4] = [0.1, 0.06, 0.005, 0.5];

/// Quantity-to-factor scale of boost materials.
const BOOST_SCALE: f64 = 0.002;

/// Exponent applied to the per-city product of boost factors.
const CITY_EXPONENT: f64 = 0.73;

/// Optimal stock of each boost material for `space` units of storage.
///
/// Quantities are returned in the same order as `coefficients` and
/// `sizes`. With `round` set, each quantity is floored to whole units so
/// the space used never exceeds `space`.
pub fn optimal_boost_quantities(
    coefficients: &[f64; 4],
    sizes: &[f64; 4],
    space: f64,
    round: bool,
) -> [f64; 4] {
    let active = coefficients.map(|c| c > 0.0);
    let mut quantities = solve_active(coefficients, sizes, space, active);
    if round {
        for q in &mut quantities {
            *q = q.floor();
        }
    }
    quantities
}

/// Solves the Lagrangian system restricted to `active` materials.
///
/// Every call that finds a negative quantity removes at least one index
/// from `active`, so recursion depth is bounded by the material count.
fn solve_active(
    coefficients: &[f64; 4],
    sizes: &[f64; 4],
    space: f64,
    active: [bool; 4],
) -> [f64; 4] {
    let mut quantities = [0.0; 4];
    let coefficient_sum: f64 = (0..4).filter(|&i| active[i]).map(|i| coefficients[i]).sum();
    let size_sum: f64 = (0..4).filter(|&i| active[i]).map(|i| sizes[i]).sum();
    if !(coefficient_sum > 0.0) || !(space > 0.0) {
        return quantities;
    }

    let scale = (space + size_sum / BOOST_SCALE) / coefficient_sum;
    let mut next = active;
    let mut dropped = false;
    for i in (0..4).filter(|&i| active[i]) {
        let q = coefficients[i] * scale / sizes[i] - 1.0 / BOOST_SCALE;
        if q < 0.0 {
            next[i] = false;
            dropped = true;
        } else {
            quantities[i] = q;
        }
    }

    if dropped {
        solve_active(coefficients, sizes, space, next)
    } else {
        quantities
    }
}

/// Production multiplier from stocked boost materials.
pub fn boost_multiplier(coefficients: &[f64; 4], quantities: &[f64; 4]) -> f64 {
    coefficients
        .iter()
        .zip(quantities)
        .map(|(c, q)| (1.0 + BOOST_SCALE * q.max(0.0)).powf(*c))
        .product::<f64>()
        .powf(CITY_EXPONENT)
}

/// Warehouse space taken by `quantities`.
pub fn boost_space(sizes: &[f64; 4], quantities: &[f64; 4]) -> f64 {
    sizes.iter().zip(quantities).map(|(s, q)| s * q).sum()
}
