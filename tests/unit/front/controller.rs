use super::*;

fn climbing() -> BurnFrontController {
    BurnFrontController::new(
        FrontConfig {
            direction: FrontDirection::BottomToTop,
            start: 1.0,
            stop_limit: -0.1,
            base_speed: 0.2,
        },
        vec![0.0, 0.5, 1.0, 2.0],
    )
    .unwrap()
}

#[test]
fn zero_multiplier_holds_position() {
    let mut f = climbing();
    assert_eq!(f.advance(1.0, 0), 1.0);
}

#[test]
fn bottom_to_top_moves_up_and_stops_at_limit() {
    let mut f = climbing();
    let mut prev = f.position();
    for _ in 0..600 {
        let p = f.advance(1.0 / 60.0, 3);
        assert!(p <= prev);
        assert!(p >= -0.1);
        prev = p;
    }
    assert!(f.at_limit());
    assert_eq!(f.progress(), 1.0);
}

#[test]
fn later_phases_burn_faster() {
    let mut slow = climbing();
    let mut fast = climbing();
    slow.advance(0.5, 1);
    fast.advance(0.5, 3);
    assert!(fast.position() < slow.position());
    assert!((slow.position() - 0.95).abs() < 1e-12);
}

#[test]
fn top_to_bottom_increases_and_clamps() {
    let mut f = BurnFrontController::new(
        FrontConfig {
            direction: FrontDirection::TopToBottom,
            start: 0.0,
            stop_limit: 0.8,
            base_speed: 1.0,
        },
        vec![1.0],
    )
    .unwrap();
    assert!((f.advance(0.25, 0) - 0.25).abs() < 1e-12);
    assert_eq!(f.advance(10.0, 0), 0.8);
    assert_eq!(f.advance(10.0, 0), 0.8);
}

#[test]
fn bad_dt_is_ignored() {
    let mut f = climbing();
    for dt in [-1.0, f64::NAN, f64::INFINITY] {
        assert_eq!(f.advance(dt, 2), 1.0);
    }
}

#[test]
fn phase_past_table_uses_last_multiplier() {
    let mut a = climbing();
    let mut b = climbing();
    assert_eq!(a.advance(0.1, 3), b.advance(0.1, 42));
}

#[test]
fn reset_returns_to_start() {
    let mut f = climbing();
    f.advance(1.0, 3);
    f.reset();
    assert_eq!(f.position(), 1.0);
    assert_eq!(f.progress(), 0.0);
}

#[test]
fn zero_span_counts_as_finished() {
    let f = BurnFrontController::new(
        FrontConfig {
            direction: FrontDirection::BottomToTop,
            start: 0.5,
            stop_limit: 0.5,
            base_speed: 1.0,
        },
        vec![1.0],
    )
    .unwrap();
    assert_eq!(f.progress(), 1.0);
}

#[test]
fn rejects_inconsistent_config() {
    let bad_side = FrontConfig {
        direction: FrontDirection::BottomToTop,
        start: 0.2,
        stop_limit: 0.9,
        base_speed: 1.0,
    };
    assert!(BurnFrontController::new(bad_side, vec![1.0]).is_err());

    let ok = FrontConfig {
        direction: FrontDirection::BottomToTop,
        start: 1.0,
        stop_limit: 0.0,
        base_speed: 1.0,
    };
    assert!(BurnFrontController::new(ok, vec![]).is_err());
    assert!(BurnFrontController::new(ok, vec![-1.0]).is_err());
    assert!(
        BurnFrontController::new(
            FrontConfig {
                base_speed: -0.5,
                ..ok
            },
            vec![1.0]
        )
        .is_err()
    );
}
