//! Tests for the loss families
//!
//! These tests verify that:
//! - Evaluation is deterministic and rejects inputs of the wrong dimension
//! - A seeded generator reproduces the same realization
//! - Each family evaluates to its defining formula
//! - Deserialization applies the same checks as the constructors

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::LossError;
use crate::loss::{Brownian, Linear, LossFunction, LossModel, NewBrownian, Quadratic};

fn all_families(n: usize, seed: u64) -> Vec<LossModel> {
    let mut rng = SmallRng::seed_from_u64(seed);
    vec![
        Linear::new(n, &mut rng).unwrap().into(),
        Quadratic::new(n, &mut rng).unwrap().into(),
        Brownian::new(n, 1.0, &mut rng).unwrap().into(),
        NewBrownian::new(n, &mut rng).unwrap().into(),
    ]
}

#[test]
fn test_compute_is_deterministic() {
    let x = [0.3, -1.2, 2.5, 0.0];
    for model in all_families(4, 11) {
        let first = model.compute(&x).unwrap();
        let second = model.compute(&x).unwrap();
        assert_eq!(first, second, "{} is not deterministic", model);
    }
}

#[test]
fn test_seed_reproduces_realization() {
    let a = all_families(3, 123);
    let b = all_families(3, 123);
    let x = [1.0, -0.5, 0.25];
    for (left, right) in a.iter().zip(&b) {
        assert_eq!(left.compute(&x), right.compute(&x));
    }
}

#[test]
fn test_dimension_mismatch_for_every_family() {
    for model in all_families(3, 1) {
        assert_eq!(
            model.compute(&[1.0, 2.0]),
            Err(LossError::DimensionMismatch {
                expected: 3,
                actual: 2
            }),
            "{} accepted a short input",
            model
        );
    }
}

#[test]
fn test_zero_dimension_rejected() {
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(Linear::new(0, &mut rng), Err(LossError::ZeroDimension));
    assert_eq!(Quadratic::new(0, &mut rng), Err(LossError::ZeroDimension));
    assert_eq!(
        Brownian::new(0, 1.0, &mut rng),
        Err(LossError::ZeroDimension)
    );
    assert_eq!(NewBrownian::new(0, &mut rng), Err(LossError::ZeroDimension));
}

#[test]
fn test_brownian_path_variance_matches_time() {
    // Row k of the increment matrix has squared norm t[k + 1]
    let mut rng = SmallRng::seed_from_u64(31);
    let model = Brownian::new(6, 2.0, &mut rng).unwrap();
    let t = model.times();
    assert_eq!(t.len(), 7);
    assert_eq!(t[0], 0.0);
    assert_eq!(model.interval(), 2.0);
    assert!(t.windows(2).all(|w| w[0] <= w[1]), "times not sorted: {t:?}");

    for (k, row) in model.increments().row_iter().enumerate() {
        let variance: f64 = row.iter().map(|v| v * v).sum();
        assert!(
            (variance - t[k + 1]).abs() < 1e-12,
            "row {k}: variance {variance}, time {}",
            t[k + 1]
        );
    }
}

#[test]
fn test_new_brownian_picks_largest_scaled_coordinate() {
    let model = NewBrownian::from_scales(vec![1.0, 2.0, 0.5]).unwrap();
    assert_eq!(model.compute(&[1.0, 1.0, 1.0]).unwrap(), 2.0);
    assert_eq!(model.compute(&[-1.0, -1.0, -1.0]).unwrap(), -0.5);
}

#[test]
fn test_uniform_draws_in_unit_interval() {
    let mut rng = SmallRng::seed_from_u64(8);
    let linear = Linear::new(50, &mut rng).unwrap();
    assert!(linear.coefficients().iter().all(|v| (0.0..1.0).contains(v)));

    let scales = NewBrownian::new(50, &mut rng).unwrap();
    assert!(scales.scales().iter().all(|v| (0.0..1.0).contains(v)));
}

#[test]
fn test_deserialize_rejects_invalid_models() {
    assert!(serde_saphyr::from_str::<Linear>("a: []").is_err());
    assert!(serde_saphyr::from_str::<NewBrownian>("sigma: [-1.0, 0.0]").is_err());
    assert!(serde_saphyr::from_str::<NewBrownian>("sigma: []").is_err());
    assert!(serde_saphyr::from_str::<Brownian>("t: []").is_err());
    assert!(serde_saphyr::from_str::<Brownian>("t: [0.0]").is_err());
    assert!(serde_saphyr::from_str::<Brownian>("t: [0.0, 0.7, 0.4, 1.0]").is_err());
    assert!(serde_saphyr::from_str::<Brownian>("t: [0.5, 1.0]").is_err());
    assert!(serde_saphyr::from_str::<Brownian>("t: [0.0, 0.0]").is_err());
}

#[test]
fn test_deserialize_valid_models() {
    let linear: Linear = serde_saphyr::from_str("a: [0.5, -2.0]").unwrap();
    assert_eq!(linear.compute(&[2.0, 1.0]).unwrap(), -1.0);

    let brownian: Brownian = serde_saphyr::from_str("t: [0.0, 1.0, 4.0]").unwrap();
    assert_eq!(brownian.dim(), 2);
    assert_eq!(brownian.interval(), 4.0);
    // Path values 1 and 1 + sqrt(3)
    let expected = 1.0 + 3.0_f64.sqrt();
    assert!((brownian.compute(&[1.0, 1.0]).unwrap() - expected).abs() < 1e-12);
}

#[test]
fn test_serialized_models_round_trip() {
    let mut rng = SmallRng::seed_from_u64(9);
    let x = [0.4, -1.1, 2.0];

    let linear = Linear::new(3, &mut rng).unwrap();
    let back: Linear = serde_saphyr::from_str(&serde_saphyr::to_string(&linear).unwrap()).unwrap();
    assert!((linear.compute(&x).unwrap() - back.compute(&x).unwrap()).abs() < 1e-12);

    let quadratic = Quadratic::new(3, &mut rng).unwrap();
    let back: Quadratic =
        serde_saphyr::from_str(&serde_saphyr::to_string(&quadratic).unwrap()).unwrap();
    assert!((quadratic.compute(&x).unwrap() - back.compute(&x).unwrap()).abs() < 1e-12);

    let brownian = Brownian::new(3, 1.0, &mut rng).unwrap();
    let back: Brownian =
        serde_saphyr::from_str(&serde_saphyr::to_string(&brownian).unwrap()).unwrap();
    assert!((brownian.compute(&x).unwrap() - back.compute(&x).unwrap()).abs() < 1e-12);

    let new_brownian = NewBrownian::new(3, &mut rng).unwrap();
    let back: NewBrownian =
        serde_saphyr::from_str(&serde_saphyr::to_string(&new_brownian).unwrap()).unwrap();
    assert!((new_brownian.compute(&x).unwrap() - back.compute(&x).unwrap()).abs() < 1e-12);
}
