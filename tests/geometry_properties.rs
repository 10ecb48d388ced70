//! Property tests for anchor resolution and view clamping.
//!
//! Run with: cargo test --test geometry_properties

use proptest::prelude::*;
use termwin::{
    Anchor, Axis, ConfigError, Dims, NoSiblings, Opc, Rect, Side, Surface,
    compute_object_positioning,
};

fn resolve(opc: &Opc, parent: Dims) -> Result<Rect, ConfigError> {
    compute_object_positioning(opc, parent, &NoSiblings)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn opposing_anchors_span_the_gap(
        height in 1u16..200,
        width in 1u16..300,
        top_pad in 0i32..100,
        bottom_pad in 0i32..100,
        left_pad in 0i32..100,
        right_pad in 0i32..100,
    ) {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top).with_pad(top_pad))
            .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(-bottom_pad))
            .anchor_left(Anchor::parent(Side::Left).with_pad(left_pad))
            .anchor_right(Anchor::parent(Side::Right).with_pad(-right_pad));

        let span_h = height as i32 - top_pad - bottom_pad;
        let span_w = width as i32 - left_pad - right_pad;
        let result = resolve(&opc, Dims::new(height, width));

        if span_h > 0 && span_w > 0 {
            let rect = result.unwrap();
            prop_assert_eq!(rect.height as i32, span_h);
            prop_assert_eq!(rect.width as i32, span_w);
            prop_assert_eq!(rect.top as i32, top_pad);
            prop_assert_eq!(rect.left as i32, left_pad);
            prop_assert!(rect.bottom() <= height && rect.right() <= width);
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn single_anchor_without_size_is_insufficient(
        height in 1u16..200,
        width in 1u16..300,
        pad in 0i32..50,
        side in prop_oneof![Just(Side::Top), Just(Side::Bottom), Just(Side::Middle)],
    ) {
        let opc = match side {
            Side::Top => Opc::new().anchor_top(Anchor::parent(side).with_pad(pad)),
            Side::Bottom => Opc::new().anchor_bottom(Anchor::parent(side).with_pad(-pad)),
            _ => Opc::new().anchor_middle(Anchor::parent(side)),
        }
        .left(0)
        .width(1);

        prop_assert_eq!(
            resolve(&opc, Dims::new(height, width)),
            Err(ConfigError::Insufficient(Axis::Vertical))
        );
    }

    #[test]
    fn fixed_size_with_one_anchor_keeps_size(
        height in 20u16..200,
        size in 1i32..10,
        pad in 0i32..5,
    ) {
        let parent = Dims::new(height, 80);
        let from_top = Opc::new()
            .anchor_top(Anchor::parent(Side::Top).with_pad(pad))
            .height(size)
            .left(0)
            .width(10);
        let from_bottom = Opc::new()
            .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(-pad))
            .height(size)
            .left(0)
            .width(10);

        let top = resolve(&from_top, parent).unwrap();
        prop_assert_eq!((top.height as i32, top.top as i32), (size, pad));

        let bottom = resolve(&from_bottom, parent).unwrap();
        prop_assert_eq!(bottom.height as i32, size);
        prop_assert_eq!(bottom.bottom() as i32, height as i32 - pad);
    }

    #[test]
    fn view_origin_stays_inside_buffer(
        lines in 1u16..100,
        cols in 1u16..100,
        view_h in 1u16..100,
        view_w in 1u16..100,
        y in -500i32..500,
        x in -500i32..500,
    ) {
        let mut surface = Surface::with_buffer(Dims::new(view_h, view_w), lines, cols);
        surface.move_view(y, x);

        let buffer = surface.buffer_dims();
        let view = surface.view_dims();
        let (oy, ox) = surface.view_origin();
        prop_assert!(oy + view.height <= buffer.height);
        prop_assert!(ox + view.width <= buffer.width);
        if y >= 0 && (y as u32) + (view.height as u32) <= buffer.height as u32 {
            prop_assert_eq!(oy as i32, y);
        }
        if x < 0 {
            prop_assert_eq!(ox, 0);
        }
    }
}

#[test]
fn view_clamps_to_far_corner() {
    let mut surface = Surface::with_buffer(Dims::new(5, 5), 10, 10);
    surface.move_view(20, 20);
    assert_eq!(surface.view_origin(), (5, 5));
}
