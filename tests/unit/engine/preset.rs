use super::*;

#[test]
fn builtins_validate() {
    for name in BurnPreset::builtin_names() {
        let p = BurnPreset::builtin(name).unwrap();
        assert_eq!(p.name, *name);
        p.validate().unwrap();
    }
}

#[test]
fn enhanced_is_six_phases_over_six_seconds() {
    let p = BurnPreset::builtin("enhanced").unwrap();
    assert_eq!(p.phases.len(), 6);
    assert_eq!(p.total_duration(), 6.0);
    assert_eq!(p.front.direction, FrontDirection::BottomToTop);
    assert_eq!(p.max_dt, 0.05);
}

#[test]
fn simple_and_scorch_shapes() {
    let s = BurnPreset::builtin("simple").unwrap();
    assert_eq!(s.phases.len(), 4);
    assert_eq!(s.total_duration(), 4.0);

    let sc = BurnPreset::builtin("scorch").unwrap();
    assert_eq!(sc.phases.len(), 5);
    assert_eq!(sc.front.direction, FrontDirection::TopToBottom);
}

#[test]
fn unknown_builtin_lists_names() {
    let err = BurnPreset::builtin("inferno").unwrap_err().to_string();
    assert!(err.contains("inferno"));
    assert!(err.contains("enhanced"));
}

#[test]
fn json_round_trip_keeps_every_field() {
    let p = BurnPreset::builtin("scorch").unwrap();
    let s = p.to_json_pretty().unwrap();
    let back = BurnPreset::from_json_str(&s).unwrap();
    assert_eq!(back, p);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = BurnPreset::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, BurnError::Serde(_)));
}

#[test]
fn invalid_values_are_config_errors() {
    let mut p = BurnPreset::builtin("simple").unwrap();
    p.phases[1].duration_secs = 0.0;
    let s = serde_json::to_string(&p).unwrap();
    let err = BurnPreset::from_json_str(&s).unwrap_err();
    assert!(matches!(err, BurnError::Config(_)), "{err}");
}

#[test]
fn validate_rejects_each_invariant() {
    let base = BurnPreset::builtin("enhanced").unwrap();

    let mut p = base.clone();
    p.ramp.swap(1, 2);
    assert!(p.validate().unwrap_err().to_string().contains("strictly increasing"));

    let mut p = base.clone();
    p.phases.clear();
    assert!(p.validate().is_err());

    let mut p = base.clone();
    p.phases[0].front_speed = -1.0;
    assert!(p.validate().is_err());

    let mut p = base.clone();
    p.phases[2].rates.smoke = f64::NAN;
    let err = p.validate().unwrap_err().to_string();
    assert!(err.contains("active_burn"), "{err}");

    let mut p = base.clone();
    p.max_dt = 0.0;
    assert!(p.validate().is_err());

    let mut p = base.clone();
    p.max_particles = MAX_PARTICLES + 1;
    assert!(p.validate().is_err());

    let mut p = base.clone();
    p.front.stop_limit = 2.0;
    assert!(p.validate().is_err());

    let mut p = base;
    p.name = "  ".to_owned();
    assert!(p.validate().is_err());
}

#[test]
fn minimal_json_fills_defaults() {
    let mut v = serde_json::to_value(BurnPreset::builtin("simple").unwrap()).unwrap();
    let obj = v.as_object_mut().unwrap();
    for key in ["seed", "heat", "max_particles", "cull_margin", "max_dt"] {
        obj.remove(key);
    }
    for phase in obj["phases"].as_array_mut().unwrap() {
        let phase = phase.as_object_mut().unwrap();
        phase.remove("front_speed");
        phase.remove("rates");
    }
    let p = BurnPreset::from_json_str(&v.to_string()).unwrap();
    assert_eq!(p.seed, 0);
    assert_eq!(p.heat, HeatParams::default());
    assert_eq!(p.max_particles, 1500);
    assert_eq!(p.max_dt, 0.05);
    assert!(p.phases.iter().all(|ph| ph.front_speed == 1.0));
    assert!(p.phases.iter().all(|ph| ph.rates == RateMultipliers::default()));
}

#[test]
fn from_path_reports_missing_file() {
    let err = BurnPreset::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, BurnError::Other(_)));
    assert!(err.to_string().contains("here.json"));
}

#[test]
fn tables_follow_phase_order() {
    let p = BurnPreset::builtin("enhanced").unwrap();
    let rates = p.rate_table();
    assert_eq!(rates.len(), 6);
    assert_eq!(rates[0].ash, 0.0);
    let tl = p.timeline().unwrap();
    assert_eq!(tl.phase(3).unwrap().name, "structural_failure");
    assert_eq!(p.intensity_curve().unwrap().len(), 6);
}
