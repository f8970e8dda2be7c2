use super::*;
use proptest::prelude::*;
use soroban_sdk::Env;

#[test]
fn ray_mul_rounds_half_up() {
    let env = Env::default();
    assert_eq!(ray_mul(&env, 5 * RAY / 2, 2 * RAY).unwrap(), 5 * RAY);
    assert_eq!(ray_mul(&env, 1, HALF_RAY).unwrap(), 1);
    assert_eq!(ray_mul(&env, 1, HALF_RAY - 1).unwrap(), 0);
    assert_eq!(ray_mul(&env, 0, RAY).unwrap(), 0);
}

#[test]
fn ray_div_rounds_half_up() {
    let env = Env::default();
    assert_eq!(ray_div(&env, 3, 2 * RAY).unwrap(), 2);
    assert_eq!(ray_div(&env, 1, 3 * RAY).unwrap(), 0);
    assert_eq!(ray_div(&env, RAY, 4 * RAY).unwrap(), RAY / 4);
}

#[test]
fn wide_intermediates_do_not_truncate() {
    let env = Env::default();
    let a = 1_000u128 * RAY;
    assert_eq!(ray_mul(&env, a, 3 * RAY).unwrap(), 3_000 * RAY);
    assert_eq!(ray_div(&env, a, 2 * RAY).unwrap(), 500 * RAY);
    assert_eq!(wad_mul(&env, 7 * WAD, 6 * WAD).unwrap(), 42 * WAD);
    assert_eq!(wad_div(&env, 42 * WAD, 6 * WAD).unwrap(), 7 * WAD);
}

#[test]
fn overflow_and_division_by_zero_are_errors() {
    let env = Env::default();
    assert_eq!(ray_mul(&env, u128::MAX, u128::MAX), Err(MathError::Overflow));
    assert_eq!(ray_div(&env, u128::MAX, 1), Err(MathError::Overflow));
    assert_eq!(ray_div(&env, 1, 0), Err(MathError::DivisionByZero));
    assert_eq!(wad_div(&env, 1, 0), Err(MathError::DivisionByZero));
    assert_eq!(percent_div(&env, 1, 0), Err(MathError::DivisionByZero));
    assert_eq!(wad_to_ray(u128::MAX), Err(MathError::Overflow));
    assert_eq!(ray_to_wad(u128::MAX), Err(MathError::Overflow));
}

#[test]
fn percentage_math() {
    let env = Env::default();
    assert_eq!(percent_mul(&env, 10_000, 9).unwrap(), 9);
    assert_eq!(percent_mul(&env, 1_000, 9).unwrap(), 1);
    assert_eq!(percent_mul(&env, 1_000, 4).unwrap(), 0);
    assert_eq!(percent_div(&env, 100, 5_000).unwrap(), 200);
    assert_eq!(percent_div(&env, 10_500, 10_500).unwrap(), 10_000);
}

#[test]
fn wad_ray_conversions() {
    assert_eq!(ray_to_wad(1_500_000_000).unwrap(), 2);
    assert_eq!(ray_to_wad(1_499_999_999).unwrap(), 1);
    assert_eq!(wad_to_ray(WAD).unwrap(), RAY);
}

#[test]
fn signed_ray_mul_keeps_sign() {
    let env = Env::default();
    assert_eq!(signed_ray_mul(&env, -2 * RAY as i128, HALF_RAY).unwrap(), -(RAY as i128));
    assert_eq!(signed_ray_mul(&env, 2 * RAY as i128, HALF_RAY).unwrap(), RAY as i128);
    assert_eq!(signed_ray_mul(&env, 0, RAY).unwrap(), 0);
}

#[test]
fn linear_interest_over_one_year() {
    let env = Env::default();
    let rate = RAY / 10;
    let factor = calculate_linear_interest(&env, rate, 0, SECONDS_PER_YEAR).unwrap();
    assert_eq!(factor, RAY + RAY / 10);
    assert_eq!(calculate_linear_interest(&env, rate, 100, 100).unwrap(), RAY);
}

#[test]
fn compounded_interest_tracks_exponential() {
    let env = Env::default();
    let rate = RAY / 10;
    assert_eq!(calculate_compounded_interest(&env, rate, 50, 50).unwrap(), RAY);
    let compounded = calculate_compounded_interest(&env, rate, 0, SECONDS_PER_YEAR).unwrap();
    let linear = calculate_linear_interest(&env, rate, 0, SECONDS_PER_YEAR).unwrap();
    assert!(compounded > linear);
    // e^0.1 = 1.1051709...
    assert!(compounded > 1_105_160_000_000_000_000_000_000_000);
    assert!(compounded < 1_105_171_000_000_000_000_000_000_000);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn ray_identity(a in 0u128..(u128::MAX / RAY)) {
        let env = Env::default();
        prop_assert_eq!(ray_mul(&env, a, RAY).unwrap(), a);
        prop_assert_eq!(ray_div(&env, a, RAY).unwrap(), a);
    }

    #[test]
    fn ray_mul_commutes(a in 0u128..(1u128 << 100), b in 0u128..(1u128 << 100)) {
        let env = Env::default();
        prop_assert_eq!(ray_mul(&env, a, b).unwrap(), ray_mul(&env, b, a).unwrap());
    }

    #[test]
    fn round_up_is_at_most_one_above_floor(
        a in 0u128..(1u128 << 110),
        b in 0u128..(1u128 << 110),
        c in 1u128..(1u128 << 100),
    ) {
        let env = Env::default();
        let floor = mul_div(&env, a, b, c);
        let ceil = mul_div_up(&env, a, b, c);
        if let (Ok(floor), Ok(ceil)) = (floor, ceil) {
            prop_assert!(ceil == floor || ceil == floor + 1);
        }
    }

    #[test]
    fn wad_ray_round_trip(a in 0u128..(u128::MAX / WAD_RAY_RATIO)) {
        prop_assert_eq!(ray_to_wad(wad_to_ray(a).unwrap()).unwrap(), a);
    }

    #[test]
    fn compounded_never_below_linear(rate in 0u128..(3 * RAY), elapsed in 0u64..(5 * SECONDS_PER_YEAR)) {
        let env = Env::default();
        let linear = calculate_linear_interest(&env, rate, 0, elapsed).unwrap();
        let compounded = calculate_compounded_interest(&env, rate, 0, elapsed).unwrap();
        prop_assert!(compounded >= linear);
    }
}
