// Property tests for slice geometry and the default height policy
use proptest::prelude::*;
use stretch_box::driver::{HeightBounds, HeightPolicy, LineCountPolicy};
use stretch_box::slice::{compute_band_rects, ContainerSize, SliceLayout, SliceRatios};

proptest! {
    #[test]
    fn source_bands_cover_image_exactly(height in 1u32..20_000) {
        let ratios = SliceRatios::new(height).expect("valid height");
        prop_assert_eq!(ratios.top_px() + ratios.middle_px() + ratios.bottom_px(), height);
    }

    #[test]
    fn custom_fractions_cover_image_exactly(
        height in 1u32..20_000,
        top in 0.01f32..0.49,
        middle in 0.01f32..0.49,
    ) {
        let ratios = SliceRatios::from_fractions(height, top, middle).expect("valid fractions");
        prop_assert_eq!(ratios.top_px() + ratios.middle_px() + ratios.bottom_px(), height);
    }

    #[test]
    fn source_rects_are_contiguous(width in 1u32..5_000, height in 1u32..5_000) {
        let layout = SliceLayout::new(width, height).expect("valid image");
        let src = layout.source_rects();

        prop_assert_eq!(src.top.y, 0);
        prop_assert_eq!(src.middle.y, src.top.height);
        prop_assert_eq!(src.bottom.y, src.middle.y + src.middle.height);
        prop_assert_eq!(src.bottom.y + src.bottom.height, height);
        prop_assert!(src.in_paint_order().iter().all(|r| r.width == width));
    }

    #[test]
    fn dest_rects_tile_container(
        width in 1u32..4_000,
        height in 1u32..4_000,
        container_w in 1.0f32..2_000.0,
        container_h in 1.0f32..2_000.0,
        fraction in 0.0f32..=1.0,
    ) {
        let stretch = container_h * fraction;
        let rects = compute_band_rects(width, height, ContainerSize::new(container_w, container_h), stretch)
            .expect("valid inputs");
        let dest = rects.dest;

        let total = dest.top.height + dest.middle.height + dest.bottom.height;
        prop_assert!((total - container_h).abs() <= container_h * 1e-5);
        prop_assert_eq!(dest.middle.y, dest.top.height);
        prop_assert!((dest.bottom.y - dest.middle.bottom()).abs() <= 1e-3);
        prop_assert_eq!(dest.middle.height, stretch);
    }

    #[test]
    fn stretch_beyond_container_rejected(
        container_h in 1.0f32..2_000.0,
        excess in 0.5f32..500.0,
    ) {
        let result = compute_band_rects(100, 100, ContainerSize::new(100.0, container_h), container_h + excess);
        prop_assert!(result.is_err());
    }

    #[test]
    fn default_policy_is_monotonic_and_bounded(
        short in "[a-z ]{0,120}",
        extra in "[a-z ]{0,120}",
        min in 1.0f32..100.0,
        span in 1.0f32..400.0,
    ) {
        let bounds = HeightBounds::new(min, min + span).expect("valid bounds");
        let policy = LineCountPolicy::default();
        let longer = format!("{short}{extra}");

        let a = policy.target_height(&short, &bounds);
        let b = policy.target_height(&longer, &bounds);

        prop_assert!(a <= b);
        prop_assert!(bounds.contains(a) && bounds.contains(b));
        prop_assert_eq!(a, policy.target_height(&short, &bounds));
    }
}

#[test]
fn reference_signal_example() {
    let bounds = HeightBounds::default();
    let policy = LineCountPolicy::default();

    assert_eq!(policy.target_height("", &bounds), bounds.min() + 20.0);
    assert_eq!(policy.target_height("hello world!!!", &bounds), bounds.min() + 20.0);
}
