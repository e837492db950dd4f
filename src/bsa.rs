//! Body surface area computation (Du Bois formula)

/// Du Bois & Du Bois: BSA = 0.007184 · height^0.725 · mass^0.425,
/// height in centimeters, mass in kilograms, result in square meters.
pub fn du_bois(height_cm: f64, mass_kg: f64) -> f64 {
    0.007184 * height_cm.powf(0.725) * mass_kg.powf(0.425)
}

/// BSA formatted the way the form displays it (two decimals)
pub fn formatted(height_cm: f64, mass_kg: f64) -> String {
    format!("{:.2}", du_bois(height_cm, mass_kg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_adult() {
        assert!((du_bois(180.0, 75.0) - 1.94).abs() < 0.01);
    }

    #[test]
    fn test_reference_child() {
        assert!((du_bois(110.0, 19.0) - 0.76).abs() < 0.01);
    }

    #[test]
    fn test_monotonic_in_both_inputs() {
        assert!(du_bois(180.0, 80.0) > du_bois(180.0, 75.0));
        assert!(du_bois(185.0, 75.0) > du_bois(180.0, 75.0));
    }

    #[test]
    fn test_formatted_two_decimals() {
        assert_eq!(formatted(180.0, 75.0), "1.94");
    }
}
