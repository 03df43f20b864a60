// tests/rut_tests.rs

use clinibot_core::crypto::rut::{check_digit, hash, is_valid, mask, normalize};

#[test]
fn normalize_strips_dots_and_uppercases() {
    assert_eq!(normalize("12.345.678-k"), "12345678-K");
    assert_eq!(normalize("7654321-6"), "7654321-6");
}

#[test]
fn known_check_digits() {
    assert!(is_valid("12345678-5"));
    assert!(!is_valid("12345678-6"));
    assert!(is_valid("12.345.678-5"));
    assert!(is_valid("10.000.013-k"));
    assert!(is_valid("10000013-K"));
    assert!(is_valid("11000003-0"));
    assert!(is_valid("1-9"));
}

#[test]
fn generated_check_digits_validate_and_single_digit_changes_fail() {
    for body in ["7654321", "12345678", "20000000", "15000000", "9999999", "11111111"] {
        let Some(dv) = check_digit(body) else {
            panic!("no check digit for {body}");
        };
        assert!(is_valid(&format!("{body}-{dv}")), "{body}-{dv} should validate");

        // Changing the first digit shifts the weighted sum by weight * delta,
        // which is never a multiple of 11 for delta in 1..=9 and weight in 2..=7.
        let first = body.as_bytes()[0] - b'0';
        let changed = (first + 1) % 10;
        let mutated = format!("{}{}", changed, &body[1..]);
        assert!(!is_valid(&format!("{mutated}-{dv}")), "{mutated}-{dv} should fail");
    }
}

#[test]
fn malformed_input_is_invalid_not_an_error() {
    assert!(!is_valid(""));
    assert!(!is_valid("12345678"));
    assert!(!is_valid("12-345-678-5"));
    assert!(!is_valid("-5"));
    assert!(!is_valid("12345678-"));
    assert!(!is_valid("12a45678-5"));
    assert!(!is_valid("12345678-55"));
    assert!(!is_valid("12 345 678-5"));
}

#[test]
fn mask_hides_last_three_body_digits() {
    assert_eq!(mask("12.345.678-5"), "12345***-5");
    assert_eq!(mask("1234-5"), "1***-5");
    assert_eq!(mask("123-6"), "***-6");
    assert_eq!(mask("1-9"), "***-9");
    assert_eq!(mask("10000013-k"), "10000***-K");
}

#[test]
fn mask_without_separator_returns_normalized_input() {
    assert_eq!(mask("12.345.678"), "12345678");
    assert_eq!(mask("1-2-3"), "1-2-3");
}

#[test]
fn hash_is_deterministic_over_raw_input() {
    assert_eq!(hash("12.345.678-5"), hash("12.345.678-5"));
    assert_eq!(
        hash("12.345.678-5"),
        "1f53709e4ea66f011a344850663ab1c364249455079ecf9da2c0fc57da645e50"
    );
    assert_ne!(hash("12.345.678-5"), hash("12345678-5"));
    assert_eq!(hash("x").len(), 64);
}
