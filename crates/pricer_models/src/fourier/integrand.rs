//! Real-axis integrands of the two transforms.
//!
//! Both work with the characteristic function of the log return so that
//! prices come out in units of the initial value:
//!
//! ```text
//! Lewis:       C = S0 - sqrt(S0 K) e^{-rT} / pi * int_0^inf Re[f_L(u)] du
//!              f_L(u) = e^{i u ln(S0/K)} phi(u - i/2) / (u^2 + 1/4)
//!
//! Carr-Madan:  C = S0 e^{-alpha k} / pi * int_0^inf Re[f_CM(u)] du,  k = ln(K/S0)
//!              f_CM(u) = e^{-i u k} e^{-rT} phi(u - (alpha + 1) i)
//!                        / (alpha^2 + alpha - u^2 + i (2 alpha + 1) u)
//! ```

use num_complex::Complex64;

use crate::models::CharacteristicFunction;

/// Lewis integrand for log-moneyness `ln(S0/K)`.
pub(crate) fn lewis<'a, C>(cf: &'a C, log_moneyness: f64, t: f64) -> impl Fn(f64) -> Complex64 + 'a
where
    C: CharacteristicFunction + ?Sized,
{
    move |u: f64| {
        let shifted = Complex64::new(u, -0.5);
        let phase = Complex64::new(0.0, u * log_moneyness).exp();
        phase * cf.log_return_cf(shifted, t) / (u * u + 0.25)
    }
}

/// Carr-Madan integrand for log-strike `ln(K/S0)` and damping `alpha`.
pub(crate) fn carr_madan<'a, C>(
    cf: &'a C,
    log_strike: f64,
    t: f64,
    alpha: f64,
) -> impl Fn(f64) -> Complex64 + 'a
where
    C: CharacteristicFunction + ?Sized,
{
    let discount = (-cf.short_rate() * t).exp();
    move |u: f64| {
        let shifted = Complex64::new(u, -(alpha + 1.0));
        let denom = Complex64::new(alpha * alpha + alpha - u * u, (2.0 * alpha + 1.0) * u);
        let phase = Complex64::new(0.0, -u * log_strike).exp();
        phase * discount * cf.log_return_cf(shifted, t) / denom
    }
}
