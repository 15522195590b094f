use super::*;

use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl BurnObserver for Recorder {
    fn on_phase_enter(&mut self, index: usize, name: &str) {
        self.events.lock().unwrap().push(format!("enter {index} {name}"));
    }

    fn on_complete(&mut self) {
        self.events.lock().unwrap().push("complete".to_owned());
    }
}

fn engine(name: &str) -> BurnEngine {
    let mut preset = BurnPreset::builtin(name).unwrap();
    preset.heat.max_grid_dim = 48;
    BurnEngine::new(preset, Region::FULL, Viewport::new(160, 120).unwrap()).unwrap()
}

#[test]
fn fresh_engine_sits_at_phase_zero() {
    let e = engine("enhanced");
    let s = e.snapshot();
    assert_eq!(s.phase_index, 0);
    assert_eq!(s.phase, "heat_up");
    assert_eq!(s.elapsed, 0.0);
    assert!(!s.complete);
    assert!(s.particles.is_empty());
    assert_eq!(s.heat_rect, Rect::new(0.0, 0.0, 160.0, 120.0));
}

#[test]
fn dt_is_clamped() {
    let mut e = engine("enhanced");
    e.tick(10.0);
    assert_eq!(e.elapsed(), 0.05);
    e.tick(-1.0);
    e.tick(f64::NAN);
    assert_eq!(e.elapsed(), 0.05);
}

#[test]
fn phases_enter_in_order_even_when_skipped() {
    let mut preset = BurnPreset::builtin("enhanced").unwrap();
    preset.heat.max_grid_dim = 16;
    preset.max_dt = 10.0;
    let mut e = BurnEngine::new(preset, Region::FULL, Viewport::new(64, 64).unwrap()).unwrap();
    let rec = Recorder::default();
    e.set_observer(rec.clone());

    e.tick(2.0);
    assert_eq!(rec.events(), ["enter 0 heat_up", "enter 1 ignition", "enter 2 active_burn"]);

    e.tick(10.0);
    let ev = rec.events();
    assert_eq!(ev.len(), 7);
    assert_eq!(ev[5], "enter 5 embers");
    assert_eq!(ev[6], "complete");
    assert!(e.is_complete());
    assert_eq!(e.elapsed(), 6.0);
}

#[test]
fn terminal_state_is_frozen() {
    let mut e = engine("simple");
    while !e.is_complete() {
        e.tick(0.05);
    }
    let (heat, phase, front) = {
        let s = e.snapshot();
        (s.heat.clone(), s.phase_index, s.front)
    };
    let spawned = e.particle_stats().spawned;
    for _ in 0..30 {
        let s = e.tick(0.05);
        assert!(s.complete);
        assert_eq!(s.phase_index, phase);
        assert_eq!(s.local_progress, 1.0);
        assert_eq!(s.progress, 1.0);
        assert_eq!(s.front, front);
        assert_eq!(*s.heat, heat);
    }
    assert_eq!(e.particle_stats().spawned, spawned);
}

#[test]
fn reset_starts_a_new_run() {
    let mut e = engine("simple");
    let rec = Recorder::default();
    e.set_observer(rec.clone());
    for _ in 0..100 {
        e.tick(0.05);
    }
    assert!(e.is_complete());
    e.reset();
    assert!(!e.is_complete());
    assert_eq!(e.elapsed(), 0.0);
    assert!(e.snapshot().particles.is_empty());
    assert_eq!(e.snapshot().front, e.preset().front.start);
    assert_eq!(e.snapshot().heat.mean_heat(), 0.0);

    for _ in 0..100 {
        e.tick(0.05);
    }
    let ev = rec.events();
    assert_eq!(ev.iter().filter(|s| *s == "complete").count(), 2);
    assert_eq!(ev.iter().filter(|s| s.starts_with("enter 0")).count(), 2);
}

#[test]
fn cleared_observer_hears_nothing() {
    let mut e = engine("simple");
    let rec = Recorder::default();
    e.set_observer(rec.clone());
    e.tick(0.01);
    e.clear_observer();
    for _ in 0..100 {
        e.tick(0.05);
    }
    assert_eq!(rec.events(), ["enter 0 ignition"]);
}

#[test]
fn front_moves_toward_its_limit() {
    let mut e = engine("scorch");
    let mut last = e.snapshot().front;
    for _ in 0..120 {
        let f = e.tick(1.0 / 30.0).front;
        assert!(f >= last);
        assert!(f <= e.preset().front.stop_limit);
        last = f;
    }
}

#[test]
fn rejects_bad_construction_inputs() {
    let p = BurnPreset::builtin("enhanced").unwrap();
    let vp = Viewport::new(32, 32).unwrap();
    assert!(BurnEngine::new(p.clone(), Region::new(0.0, 0.0, 0.0, 1.0), vp).is_err());
    assert!(BurnEngine::new(p.clone(), Region::new(0.2, 0.2, 0.5, 0.0), vp).is_err());
    let zero = Viewport {
        width: 0,
        height: 10,
    };
    assert!(BurnEngine::new(p.clone(), Region::FULL, zero).is_err());

    let mut bad = p;
    bad.phases[0].duration_secs = -1.0;
    assert!(BurnEngine::new(bad, Region::FULL, vp).is_err());
}

#[test]
fn custom_rng_is_accepted() {
    let p = BurnPreset::builtin("simple").unwrap();
    let rng = Rng64::new(99);
    let mut e = BurnEngine::with_rng(p, Region::FULL, Viewport::new(40, 40).unwrap(), rng).unwrap();
    for _ in 0..20 {
        e.tick(0.05);
    }
    assert!(e.particle_stats().spawned > 0);
    assert_eq!(e.preset_name(), "simple");
    assert_eq!(e.total_duration(), 4.0);
}

#[test]
fn debug_output_names_preset_and_state() {
    let e = engine("enhanced");
    let text = format!("{e:?}");
    assert!(text.starts_with("BurnEngine"));
    assert!(text.contains("\"enhanced\""));
    assert!(text.contains("complete: false"));

    let p = BurnPreset::builtin("simple").unwrap();
    let mut e =
        BurnEngine::with_rng(p, Region::FULL, Viewport::new(40, 40).unwrap(), Rng64::new(3))
            .unwrap();
    e.set_observer(Recorder::default());
    while !e.is_complete() {
        e.tick(0.05);
    }
    let text = format!("{e:?}");
    assert!(text.contains("\"simple\""));
    assert!(text.contains("complete: true"));
    assert!(text.contains("observer: true"));
}
