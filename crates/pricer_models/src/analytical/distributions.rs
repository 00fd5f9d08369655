//! Standard normal distribution functions.
//!
//! - `norm_cdf`: Cumulative distribution function, double precision
//! - `norm_pdf`: Probability density function

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// sqrt(2 * pi)
const SQRT_2PI: f64 = 2.506_628_274_631_000_5;

/// Standard normal cumulative distribution function.
///
/// Hart's (1968) rational approximation in the form given by West (2005),
/// accurate to about 1e-14 over the whole real line.
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!((norm_cdf(1.0) - 0.841_344_746_068_542_9).abs() < 1e-12);
/// assert!((norm_cdf(-1.0) + norm_cdf(1.0) - 1.0).abs() < 1e-15);
/// ```
pub fn norm_cdf(x: f64) -> f64 {
    let z = x.abs();
    let tail = if z > 37.0 {
        0.0
    } else {
        let e = (-0.5 * z * z).exp();
        if z < 7.071_067_811_865_47 {
            let num = ((((((3.526_249_659_989_11e-2 * z + 0.700_383_064_443_688) * z
                + 6.373_962_203_531_65)
                * z
                + 33.912_866_078_383)
                * z
                + 112.079_291_497_871)
                * z
                + 221.213_596_169_931)
                * z
                + 220.206_867_912_376)
                * e;
            let den = ((((((8.838_834_764_831_84e-2 * z + 1.755_667_163_182_64) * z
                + 16.064_177_579_207)
                * z
                + 86.780_732_202_946_1)
                * z
                + 296.564_248_779_674)
                * z
                + 637.333_633_378_831)
                * z
                + 793.826_512_519_948)
                * z
                + 440.413_735_824_752;
            num / den
        } else {
            let b = z + 1.0 / (z + 2.0 / (z + 3.0 / (z + 4.0 / (z + 0.65))));
            e / b / SQRT_2PI
        }
    };
    if x > 0.0 {
        1.0 - tail
    } else {
        tail
    }
}

/// Standard normal probability density function.
///
/// # Examples
/// ```
/// use pricer_models::analytical::norm_pdf;
///
/// assert!((norm_pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-16);
/// ```
#[inline]
pub fn norm_pdf(x: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values() {
        assert_relative_eq!(norm_cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_relative_eq!(norm_cdf(-2.5), 0.006_209_665_325_776_132, epsilon = 1e-12);
        assert_relative_eq!(norm_cdf(0.3), 0.617_911_422_188_952_7, epsilon = 1e-12);
    }

    #[test]
    fn test_far_tails() {
        assert_eq!(norm_cdf(-40.0), 0.0);
        assert_eq!(norm_cdf(40.0), 1.0);
        assert_relative_eq!(norm_cdf(-8.0), 6.220_960_574_271_785e-16, max_relative = 1e-6);
    }

    #[test]
    fn test_monotone() {
        let mut prev = 0.0;
        for k in -800..=800 {
            let v = norm_cdf(k as f64 * 0.01);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_pdf_is_derivative_of_cdf() {
        let h = 1e-5;
        for x in [-2.0, -0.5, 0.0, 1.3] {
            let fd = (norm_cdf(x + h) - norm_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(fd, norm_pdf(x), epsilon = 1e-9);
        }
    }
}
