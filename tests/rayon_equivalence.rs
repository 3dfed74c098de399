#![cfg(feature = "rayon")]

use phasematch::{MatchConfig, Matcher, OwnedImage, Strategy};
use std::time::Duration;

fn make_map(width: usize, height: usize) -> OwnedImage<u8> {
    OwnedImage::from_fn(width, height, |x, y| {
        let value = ((x * 11) ^ (y * 3) ^ (x * y / 7)) & 0xFF;
        value as u8
    })
    .unwrap()
}

fn frame(map: &OwnedImage<u8>, cx: f64, cy: f64) -> OwnedImage<u8> {
    OwnedImage::from_view(map.view().crop_centered(cx, cy, 400, 400).unwrap()).unwrap()
}

#[test]
fn parallel_matches_sequential_phase() {
    let map = make_map(900, 900);
    let template = frame(&map, 465.0, 430.0);

    let seq = Matcher::default()
        .register(template.view(), map.view(), 450.0, 450.0)
        .unwrap();
    let par = Matcher::new(MatchConfig {
        parallel: true,
        ..MatchConfig::default()
    })
    .register(template.view(), map.view(), 450.0, 450.0)
    .unwrap();

    assert_eq!(seq, par);
}

#[test]
fn parallel_matches_sequential_zncc() {
    let map = make_map(700, 700);
    let template = frame(&map, 350.0, 350.0);
    let cfg = MatchConfig {
        strategy: Strategy::Zncc,
        step_x: 25,
        step_y: 30,
        ..MatchConfig::default()
    };

    let seq = Matcher::new(cfg.clone())
        .register(template.view(), map.view(), 350.0, 350.0)
        .unwrap();
    let par = Matcher::new(MatchConfig {
        parallel: true,
        ..cfg
    })
    .register(template.view(), map.view(), 350.0, 350.0)
    .unwrap();

    assert_eq!(seq, par);
}

#[test]
fn parallel_deadline_keeps_first_window() {
    let map = make_map(900, 900);
    let template = frame(&map, 450.0, 450.0);

    let reg = Matcher::new(MatchConfig {
        parallel: true,
        deadline: Some(Duration::ZERO),
        ..MatchConfig::default()
    })
    .register(template.view(), map.view(), 450.0, 450.0)
    .unwrap();

    assert!(reg.candidates.iter().any(|c| c.grid_idx == 0));
    assert!(reg.averaged >= 1);
}
