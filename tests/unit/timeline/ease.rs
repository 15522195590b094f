use super::*;

const CURVES: [Ease; 6] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::OutCubic,
    Ease::Smoothstep,
];

#[test]
fn endpoints_are_stable() {
    for ease in CURVES {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in CURVES {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b && b < c, "{ease:?}");
    }
}

#[test]
fn hold_never_leaves_start() {
    assert_eq!(Ease::Hold.apply(0.0), 0.0);
    assert_eq!(Ease::Hold.apply(1.0), 0.0);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::OutCubic.apply(-2.0), 0.0);
    assert_eq!(Ease::InQuad.apply(3.0), 1.0);
}
