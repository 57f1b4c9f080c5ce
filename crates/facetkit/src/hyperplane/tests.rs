use super::*;
use crate::cfg::NumericCfg;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn ctx(distance_eps: f64, angle_eps: f64) -> NumericContext {
    NumericContext::new(NumericCfg::new(distance_eps, angle_eps))
}

#[test]
fn distance_point_on_plane() {
    let c = NumericContext::default();
    let normal = [0.0, 0.0, 1.0];
    let h = Hyperplane::new(&c, &normal, -5.0);
    let x = [1.0, 2.0, 5.0];
    assert_eq!(h.distance(&Point::new(&x)), 0.0);
    let above = [0.0, 0.0, 7.5];
    assert_eq!(h.distance(&Point::new(&above)), 2.5);
}

#[test]
fn distance_beyond_unrolled_dimensions() {
    let c = NumericContext::default();
    for dim in [1usize, 9, 12] {
        let normal: Vec<f64> = (0..dim).map(|k| k as f64 + 1.0).collect();
        let x = vec![1.0; dim];
        let h = Hyperplane::new(&c, &normal, -1.0);
        let expected = -1.0 + (dim * (dim + 1) / 2) as f64;
        assert_eq!(h.distance(&Point::new(&x)), expected);
    }
}

#[test]
#[should_panic(expected = "does not match hyperplane dimension")]
fn distance_dimension_mismatch_panics() {
    let c = NumericContext::default();
    let normal = [1.0, 0.0];
    let x = [1.0, 2.0, 3.0];
    Hyperplane::new(&c, &normal, 0.0).distance(&Point::new(&x));
}

#[test]
fn unrolled_agrees_with_loop_seeded() {
    let c = NumericContext::default();
    let mut rng = StdRng::seed_from_u64(42);
    for dim in 2..=8 {
        for _ in 0..200 {
            let n: Vec<f64> = (0..dim).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let x: Vec<f64> = (0..dim).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let h = Hyperplane::new(&c, &n, rng.gen_range(-10.0..10.0));
            let p = Point::new(&x);
            assert_eq!(h.distance(&p).to_bits(), h.distance_generic(&p).to_bits());
        }
    }
}

fn plane_and_point() -> impl Strategy<Value = (Vec<f64>, Vec<f64>, f64)> {
    (2usize..=8).prop_flat_map(|d| {
        (
            prop::collection::vec(-1e3..1e3f64, d),
            prop::collection::vec(-1e3..1e3f64, d),
            -1e3..1e3f64,
        )
    })
}

proptest! {
    #[test]
    fn unrolled_agrees_with_loop((n, x, offset) in plane_and_point()) {
        let c = NumericContext::default();
        let h = Hyperplane::new(&c, &n, offset);
        let p = Point::new(&x);
        prop_assert_eq!(h.distance(&p).to_bits(), h.distance_generic(&p).to_bits());
    }

    #[test]
    fn equals_is_reflexive((n, _x, offset) in plane_and_point()) {
        let c = NumericContext::default();
        let h = Hyperplane::new(&c, &n, offset);
        prop_assert!(h.equals(&h));
        let copy = n.clone();
        prop_assert!(h.equals(&Hyperplane::new(&c, &copy, offset)));
    }
}

#[test]
fn equals_within_mixed_tolerances() {
    let c = ctx(1e-6, 1e-6);
    let na = [1.0, 0.0];
    let nb = [1.0, 1e-10];
    let a = Hyperplane::new(&c, &na, 0.0);
    let b = Hyperplane::new(&c, &nb, 1e-10);
    assert!(a.equals(&b));
    assert!(a == b);
}

#[test]
fn offset_beyond_distance_eps_is_unequal() {
    let c = ctx(1e-6, 1e-6);
    let n = [0.0, 1.0];
    let a = Hyperplane::new(&c, &n, 0.0);
    let b = Hyperplane::new(&c, &n, 2e-6);
    assert!(!a.equals(&b));
}

#[test]
fn normal_beyond_angle_eps_is_unequal() {
    // Δn = (5e-4, 0) squares to 2.5e-7 and passes; (2e-3)^2 = 4e-6 fails.
    let c = ctx(1e-6, 1e-6);
    let na = [1.0, 0.0];
    let nb = [1.0 + 5e-4, 0.0];
    let nc = [1.0 + 2e-3, 0.0];
    let a = Hyperplane::new(&c, &na, 0.5);
    assert!(a.equals(&Hyperplane::new(&c, &nb, 0.5)));
    assert!(!a.equals(&Hyperplane::new(&c, &nc, 0.5)));
}

#[test]
fn angle_eps_is_compared_to_squared_difference() {
    // Δn = 1e-4 per axis: linear gap 1e-4 > eps, squared sum 2e-8 < eps.
    let c = ctx(1e-9, 1e-6);
    let na = [0.6, 0.8];
    let nb = [0.6 + 1e-4, 0.8 + 1e-4];
    let a = Hyperplane::new(&c, &na, 1.0);
    assert!(a.equals(&Hyperplane::new(&c, &nb, 1.0)));
}

#[test]
fn identical_storage_skips_normal_check() {
    // A negative angle_eps rejects every distinct copy but not shared storage.
    let c = ctx(1e-9, -1.0);
    let n = [0.3, 0.4];
    let copy = n;
    let a = Hyperplane::new(&c, &n, 1.0);
    let b = Hyperplane::new(&c, &n, 1.0);
    assert!(a.equals(&b));
    assert!(!a.equals(&Hyperplane::new(&c, &copy, 1.0)));
}

#[test]
fn different_dimensions_are_unequal() {
    let c = NumericContext::default();
    let n2 = [1.0, 0.0];
    let n3 = [1.0, 0.0, 0.0];
    assert!(!Hyperplane::new(&c, &n2, 0.0).equals(&Hyperplane::new(&c, &n3, 0.0)));
}

#[test]
fn norm_basics() {
    let c = NumericContext::default();
    let zero = [0.0; 4];
    let unit = [0.0, 1.0, 0.0];
    let v = [3.0, 4.0];
    assert_eq!(Hyperplane::new(&c, &zero, 7.0).norm(), 0.0);
    assert_eq!(Hyperplane::new(&c, &unit, -2.0).norm(), 1.0);
    assert_eq!(Hyperplane::new(&c, &v, 100.0).norm(), 5.0);
    assert_eq!(Hyperplane::empty(&c).norm(), 0.0);
    assert_eq!(Hyperplane::new(&c, &v, 0.0).normal().norm(), 5.0);
}

#[test]
fn flat_export_round_trip() {
    let c = NumericContext::default();
    let n = [0.0, 0.6, 0.8];
    let h = Hyperplane::new(&c, &n, -2.25);
    let flat = h.to_vec();
    assert_eq!(flat, vec![0.0, 0.6, 0.8, -2.25]);
    let back = Hyperplane::from_flat(&c, &flat).unwrap();
    assert_eq!(back.dimension(), 3);
    assert_eq!(back.offset(), -2.25);
    assert!(back.equals(&h));
    assert!(Hyperplane::from_flat(&c, &[]).is_none());
}

#[test]
fn record_round_trip_through_json() {
    let c = NumericContext::default();
    let n = [1.0, -1.0];
    let h = Hyperplane::new(&c, &n, 0.5);
    let json = serde_json::to_string(&h.to_record()).unwrap();
    let rec: HyperplaneRecord = serde_json::from_str(&json).unwrap();
    assert!(rec.as_hyperplane(&c).equals(&h));
}

#[test]
fn text_rendering() {
    let c = NumericContext::default();
    let n = [0.0, 0.0, 1.0];
    let h = Hyperplane::new(&c, &n, -5.0);
    assert_eq!(h.to_string(), " 0 0 1 -5\n");
    assert_eq!(
        h.print(Some("normal:"), Some(" offset:")).to_string(),
        "normal: 0 0 1 offset: -5\n"
    );
    let third = [1.0 / 3.0, 1e-7];
    let h = Hyperplane::new(&c, &third, 1234567.0);
    assert_eq!(h.to_string(), " 0.333333 1e-07 1.23457e+06\n");
}
