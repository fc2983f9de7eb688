/// Reusable statistical functions for dashboard analytics.

/// Arithmetic mean. Returns 0.0 if the slice is empty.
pub fn media(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the strictly positive values only; zeros mean "no data".
/// Returns None when no value qualifies.
pub fn media_positiva(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let positivos: Vec<f64> = values.into_iter().filter(|v| *v > 0.0).collect();
    if positivos.is_empty() {
        None
    } else {
        Some(media(&positivos))
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Share of `count` in `total`, in [0, 1]. Returns 0.0 if `total` is 0.
pub fn fracao(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_empty() {
        assert_eq!(media(&[]), 0.0);
    }

    #[test]
    fn test_media_known() {
        // (2 + 4 + 6) / 3 = 4.0
        assert!((media(&[2.0, 4.0, 6.0]) - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_media_positiva_ignores_zero() {
        // zeros excluded from numerator and denominator: (10 + 20) / 2
        assert_eq!(media_positiva([0.0, 10.0, 0.0, 20.0]), Some(15.0));
        assert_eq!(media_positiva([0.0, -5.0]), None);
        assert_eq!(media_positiva(Vec::new()), None);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(3.75), 3.8);
        assert_eq!(round1(4.0), 4.0);
        assert_eq!(round1(2.349), 2.3);
    }

    #[test]
    fn test_fracao() {
        assert_eq!(fracao(1, 0), 0.0);
        assert_eq!(fracao(1, 4), 0.25);
    }
}
