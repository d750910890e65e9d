//! Pressure-unit helpers.
//!
//! The hydraulic solver reports nodal service pressure as head in meters of
//! water column; operational thresholds are quoted in bar. One fixed
//! conversion constant covers both directions.

/// Meters of water column per bar (1 bar corresponds to 10.2 m head).
pub const M_PER_BAR: f64 = 10.2;

/// Convert head in meters to bar.
#[inline]
pub fn m_to_bar(m: f64) -> f64 {
    m / M_PER_BAR
}

/// Convert bar to head in meters.
#[inline]
pub fn bar_to_m(bar: f64) -> f64 {
    bar * M_PER_BAR
}

/// Render a head value in both units, e.g. `12.3 m ≈ 1.21 bar`.
pub fn fmt_m_bar(m: f64) -> String {
    format!("{:.1} m ≈ {:.2} bar", m, m_to_bar(m))
}
