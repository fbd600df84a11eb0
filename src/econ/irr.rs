//! Internal rate of return of a well's cash flow

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_PERIODIC_RATE: f64 = -0.99;
const MAX_PERIODIC_RATE: f64 = 10.0;

/// Annual IRR of evenly spaced cash flows.
///
/// Solves for the periodic rate with Newton-Raphson and falls back to
/// bisection when the derivative vanishes or Newton does not converge.
/// Returns `None` when the flows never change sign (no IRR exists).
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }
    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let annualize = |periodic: f64| (1.0 + periodic).powi(periods_per_year as i32) - 1.0;

    let mut rate = 0.1 / periods_per_year as f64;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_with_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            break;
        }
        let next = (rate - npv / slope).clamp(MIN_PERIODIC_RATE, MAX_PERIODIC_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(annualize(next));
        }
        rate = next;
    }

    bisect(cashflows).map(annualize)
}

/// NPV at a periodic rate and its derivative with respect to the rate
fn npv_with_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (t, &cf)| {
            let factor = (1.0 + rate).powi(t as i32);
            (npv + cf / factor, slope - t as f64 * cf / (factor * (1.0 + rate)))
        })
}

fn npv(cashflows: &[f64], rate: f64) -> f64 {
    npv_with_slope(cashflows, rate).0
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let (mut low, mut high) = (MIN_PERIODIC_RATE, MAX_PERIODIC_RATE);
    let mut npv_low = npv(cashflows, low);
    if npv_low * npv(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(cashflows, mid);
        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_year_payback() {
        // Drill for 1000, sell for 1100 twelve months later
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 0.001);
    }

    #[test]
    fn test_no_sign_change() {
        assert_eq!(calculate_irr(&[100.0, 50.0, 25.0], 12), None);
        assert_eq!(calculate_irr(&[], 12), None);
    }

    #[test]
    fn test_declining_well() {
        let mut cashflows = vec![-500_000.0];
        cashflows.extend((0..120).map(|m| 20_000.0 * 0.98_f64.powi(m)));
        let irr = calculate_irr(&cashflows, 12).unwrap();
        assert!(irr > 0.0 && irr < 2.0, "unexpected IRR {}", irr);
    }
}
