/// Largest difference accepted for a fractional answer.
pub const DECIMAL_TOLERANCE: f64 = 0.01;

/// Integer answers must match exactly; fractional answers are accepted within
/// `DECIMAL_TOLERANCE`.
#[must_use]
pub fn is_answer_correct(user_answer: f64, correct_answer: f64) -> bool {
    if correct_answer.fract() == 0.0 {
        user_answer == correct_answer
    } else {
        (user_answer - correct_answer).abs() < DECIMAL_TOLERANCE
    }
}

/// Parse player input into a number. Blank or non-numeric input is `None`.
#[must_use]
pub fn parse_answer(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_answers_need_exact_match() {
        assert!(is_answer_correct(5.0, 5.0));
        assert!(!is_answer_correct(6.0, 5.0));
        assert!(!is_answer_correct(5.001, 5.0));
    }

    #[test]
    fn fractional_answers_allow_small_error() {
        assert!(is_answer_correct(0.33, 1.0 / 3.0));
        assert!(is_answer_correct(2.5, 2.5));
        assert!(!is_answer_correct(0.35, 1.0 / 3.0));
    }

    #[test]
    fn parse_accepts_signed_decimals() {
        assert_eq!(parse_answer(" 42 "), Some(42.0));
        assert_eq!(parse_answer("-7"), Some(-7.0));
        assert_eq!(parse_answer("3.25"), Some(3.25));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("abc"), None);
        assert_eq!(parse_answer("inf"), None);
        assert_eq!(parse_answer("NaN"), None);
    }
}
