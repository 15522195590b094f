use super::*;

fn fire_ramp() -> ColorRamp {
    ColorRamp::new(vec![
        RampStop::new(0.0, Rgba8::new(0, 0, 0, 0)),
        RampStop::new(0.3, Rgba8::new(120, 20, 0, 140)),
        RampStop::new(0.7, Rgba8::new(255, 140, 20, 230)),
        RampStop::new(1.0, Rgba8::new(255, 250, 220, 255)),
    ])
    .unwrap()
}

#[test]
fn endpoints_return_exact_stops() {
    let ramp = fire_ramp();
    assert_eq!(ramp.lookup(0.0), ramp.stops()[0].rgba);
    assert_eq!(ramp.lookup(1.0), ramp.stops()[3].rgba);
}

#[test]
fn out_of_range_values_clamp() {
    let ramp = fire_ramp();
    assert_eq!(ramp.lookup(-4.0), ramp.lookup(0.0));
    assert_eq!(ramp.lookup(9.0), ramp.lookup(1.0));
    assert_eq!(ramp.lookup(f64::NAN), ramp.lookup(0.0));
}

#[test]
fn interior_stop_is_hit_exactly() {
    let ramp = fire_ramp();
    assert_eq!(ramp.lookup(0.3), Rgba8::new(120, 20, 0, 140));
}

#[test]
fn interpolates_channels_linearly() {
    let ramp = ColorRamp::new(vec![
        RampStop::new(0.0, Rgba8::new(0, 100, 200, 0)),
        RampStop::new(1.0, Rgba8::new(200, 100, 0, 255)),
    ])
    .unwrap();
    assert_eq!(ramp.lookup(0.5), Rgba8::new(100, 100, 100, 128));
    assert_eq!(ramp.lookup(0.25), Rgba8::new(50, 100, 150, 64));
}

#[test]
fn rejects_non_increasing_thresholds() {
    let err = ColorRamp::new(vec![
        RampStop::new(0.0, Rgba8::transparent()),
        RampStop::new(0.5, Rgba8::transparent()),
        RampStop::new(0.5, Rgba8::transparent()),
        RampStop::new(1.0, Rgba8::transparent()),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("strictly increasing"));
}

#[test]
fn rejects_bad_endpoints_and_short_ramps() {
    assert!(ColorRamp::new(vec![RampStop::new(0.0, Rgba8::transparent())]).is_err());
    assert!(
        ColorRamp::new(vec![
            RampStop::new(0.1, Rgba8::transparent()),
            RampStop::new(1.0, Rgba8::transparent()),
        ])
        .is_err()
    );
    assert!(
        ColorRamp::new(vec![
            RampStop::new(0.0, Rgba8::transparent()),
            RampStop::new(0.9, Rgba8::transparent()),
        ])
        .is_err()
    );
    assert!(
        ColorRamp::new(vec![
            RampStop::new(0.0, Rgba8::transparent()),
            RampStop::new(f64::NAN, Rgba8::transparent()),
            RampStop::new(1.0, Rgba8::transparent()),
        ])
        .is_err()
    );
}
