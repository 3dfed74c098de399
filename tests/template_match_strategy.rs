use phasematch::lowlevel::{Kernel, ZnccPlan, ZnccScalar};
use phasematch::{
    template_match, ErrorKind, ImageView, MatchConfig, Matcher, OwnedImage, PhaseMatchError,
    Strategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAP_SIZE: usize = 900;

fn synthetic_map(seed: u64) -> OwnedImage<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    OwnedImage::from_fn(MAP_SIZE, MAP_SIZE, |_, _| rng.random_range(0..=255)).unwrap()
}

/// Lattice noise with bilinear interpolation, correlated over ~`cell` pixels.
fn smooth_map(seed: u64, cell: usize) -> OwnedImage<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let nodes = MAP_SIZE / cell + 2;
    let lattice: Vec<f64> = (0..nodes * nodes)
        .map(|_| rng.random_range(0.0..255.0))
        .collect();
    OwnedImage::from_fn(MAP_SIZE, MAP_SIZE, |x, y| {
        let (gx, gy) = (x / cell, y / cell);
        let fx = (x % cell) as f64 / cell as f64;
        let fy = (y % cell) as f64 / cell as f64;
        let at = |i: usize, j: usize| lattice[j * nodes + i];
        let top = at(gx, gy) * (1.0 - fx) + at(gx + 1, gy) * fx;
        let bottom = at(gx, gy + 1) * (1.0 - fx) + at(gx + 1, gy + 1) * fx;
        (top * (1.0 - fy) + bottom * fy) as u8
    })
    .unwrap()
}

fn uav_frame(map: &OwnedImage<u8>, cx: f64, cy: f64, size: usize) -> OwnedImage<u8> {
    let crop = map.view().crop_centered(cx, cy, size, size).unwrap();
    OwnedImage::from_view(crop).unwrap()
}

#[test]
fn best_window_center_is_returned() {
    let map = synthetic_map(31);
    // Window centers sit at 375, 425 and 475 on both axes.
    let template = uav_frame(&map, 425.0, 475.0, 400);

    let (x, y) = template_match(template.view(), map.view(), 450.0, 450.0, 50).unwrap();
    assert_eq!((x, y), (425, 475));
}

#[test]
fn off_grid_target_snaps_to_nearest_window() {
    let map = smooth_map(32, 32);
    let template = uav_frame(&map, 380.0, 470.0, 400);

    let reg = Matcher::new(MatchConfig {
        strategy: Strategy::Zncc,
        ..MatchConfig::default()
    })
    .register(template.view(), map.view(), 450.0, 450.0)
    .unwrap();
    assert_eq!((reg.x, reg.y), (375, 475));
    assert_eq!(reg.averaged, 1);
    assert_eq!(reg.candidates.len(), 9);
    assert!(reg.score > reg.candidates[1].score);
}

#[test]
fn exact_window_scores_one() {
    let map = synthetic_map(33);
    let template = uav_frame(&map, 475.0, 375.0, 300);

    let reg = Matcher::new(MatchConfig {
        strategy: Strategy::Zncc,
        ..MatchConfig::default()
    })
    .register(template.view(), map.view(), 450.0, 450.0)
    .unwrap();
    assert!((reg.score - 1.0).abs() < 1e-9, "score {}", reg.score);
    assert_eq!((reg.x, reg.y), (475, 375));
}

#[test]
fn constant_template_is_degenerate() {
    let map = synthetic_map(34);
    let flat = OwnedImage::new(vec![128u8; 400 * 400], 400, 400).unwrap();

    let err = template_match(flat.view(), map.view(), 450.0, 450.0, 50).unwrap_err();
    assert_eq!(err, PhaseMatchError::DegenerateScore { candidates: 9 });
    assert_eq!(err.kind(), ErrorKind::DegenerateScore);
}

#[test]
fn candidate_count_is_still_validated() {
    let map = synthetic_map(35);
    let template = uav_frame(&map, 450.0, 450.0, 400);

    let err = Matcher::new(MatchConfig {
        strategy: Strategy::Zncc,
        candidate_count: 0,
        ..MatchConfig::default()
    })
    .register(template.view(), map.view(), 450.0, 450.0)
    .unwrap_err();
    assert!(matches!(
        err,
        PhaseMatchError::CandidateCountOutOfRange { count: 0, .. }
    ));
}

#[test]
fn kernel_score_is_pearson_coefficient() {
    let tpl: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
    let win: Vec<u8> = vec![2, 4, 6, 8, 10, 12, 14, 16, 19];
    let plan = ZnccPlan::from_view(ImageView::from_slice(&tpl, 3, 3).unwrap()).unwrap();
    let score = ZnccScalar::score_window(ImageView::from_slice(&win, 3, 3).unwrap(), &plan)
        .unwrap()
        .score;

    let a: Vec<f64> = tpl.iter().map(|&v| f64::from(v)).collect();
    let b: Vec<f64> = win.iter().map(|&v| f64::from(v)).collect();
    let ma = a.iter().sum::<f64>() / 9.0;
    let mb = b.iter().sum::<f64>() / 9.0;
    let cov: f64 = a.iter().zip(&b).map(|(x, y)| (x - ma) * (y - mb)).sum();
    let va: f64 = a.iter().map(|x| (x - ma) * (x - ma)).sum();
    let vb: f64 = b.iter().map(|y| (y - mb) * (y - mb)).sum();
    assert!((score - cov / (va * vb).sqrt()).abs() < 1e-12);
    assert!(score > 0.99 && score < 1.0);
}
