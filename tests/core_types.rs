use phasematch::lowlevel::{SearchGrid, ZnccPlan};
use phasematch::{ErrorKind, GridPolicy, ImageView, OwnedImage, PhaseMatchError};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        PhaseMatchError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
}

#[test]
fn image_view_rejects_invalid_stride() {
    let data = [0u8; 8];

    let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
    assert_eq!(
        err,
        PhaseMatchError::InvalidStride {
            width: 4,
            stride: 3,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, PhaseMatchError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn crop_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let crop = view.crop(1, 1, 2, 2).unwrap();
    assert_eq!((crop.width(), crop.height(), crop.stride()), (2, 2, 4));
    assert_eq!(crop.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(crop.row(1).unwrap(), &[9u8, 10u8]);
    assert!(crop.get(2, 0).is_none());

    let err = view.crop(3, 3, 2, 2).err().unwrap();
    assert_eq!(
        err,
        PhaseMatchError::CropOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
    assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
}

#[test]
fn negative_crop_origin_is_reported() {
    let data = [0u8; 100];
    let view = ImageView::from_slice(&data, 10, 10).unwrap();
    let err = view.crop_centered(2.0, 5.0, 6, 6).err().unwrap();
    assert_eq!(
        err,
        PhaseMatchError::CropOutOfBounds {
            x: -1,
            y: 2,
            width: 6,
            height: 6,
            img_width: 10,
            img_height: 10,
        }
    );
    assert!(err.to_string().contains("out-of-bounds crop"));
}

#[test]
fn owned_image_round_trips_through_view() {
    let owned = OwnedImage::from_fn(3, 2, |x, y| (x + 10 * y) as u16).unwrap();
    let view = owned.view();
    assert_eq!(view.row(1).unwrap(), &[10u16, 11, 12]);
    let copy = OwnedImage::from_view(view.crop(1, 0, 2, 2).unwrap()).unwrap();
    assert_eq!(copy.data(), &[1u16, 2, 11, 12]);
}

#[test]
fn zncc_plan_matches_known_stats() {
    let data = [0u8, 1, 2, 3];
    let plan = ZnccPlan::from_view(ImageView::from_slice(&data, 2, 2).unwrap()).unwrap();
    assert!((plan.mean() - 1.5).abs() < 1e-12);
    assert!((plan.var_t() - 5.0).abs() < 1e-12);
}

#[test]
fn search_grid_follows_generation_order() {
    let grid = SearchGrid::new(450, 300, 50, 50, GridPolicy::Truncate).unwrap();
    assert_eq!(grid.len(), 9);
    let third = grid.cell(3).unwrap();
    assert_eq!((third.x, third.y), (50, 0));
}
