//! Geometry resolver.
//!
//! Turns an [`Opc`] into an absolute `(height, width, top, left)` rectangle
//! relative to the parent. Anchors on the parent resolve from the parent's
//! dimensions alone; anchors on siblings read the sibling's already computed
//! rectangle through an [`AnchorLookup`]. There is no constraint solving:
//! callers resolve objects in dependency order.

use crate::error::{Axis, ConfigError};
use crate::types::{Dims, Rect};

use super::anchor::{Anchor, AnchorTarget, Side};
use super::opc::{HorizontalMode, Opc, VerticalMode};

/// Source of already positioned sibling rectangles.
pub trait AnchorLookup {
    /// Rectangle of `target`, or `None` if it is not positioned (yet).
    fn rect_of(&self, target: AnchorTarget) -> Option<Rect>;
}

/// No siblings: only parent anchors resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSiblings;

impl AnchorLookup for NoSiblings {
    fn rect_of(&self, _target: AnchorTarget) -> Option<Rect> {
        None
    }
}

impl<F> AnchorLookup for F
where
    F: Fn(AnchorTarget) -> Option<Rect>,
{
    fn rect_of(&self, target: AnchorTarget) -> Option<Rect> {
        self(target)
    }
}

/// Compute the object position from `opc` inside a parent of size `parent`.
///
/// Fails with a [`ConfigError`] when the configuration is under-specified,
/// references an unknown sibling, or produces an empty/negative rectangle.
pub fn compute_object_positioning(
    opc: &Opc,
    parent: Dims,
    lookup: &dyn AnchorLookup,
) -> Result<Rect, ConfigError> {
    check_anchor_sides(opc)?;

    let (height, top) = resolve_vertical(opc, parent, lookup)?;
    let (width, left) = resolve_horizontal(opc, parent, lookup)?;

    Ok(Rect::new(
        to_size(Axis::Vertical, height)?,
        to_size(Axis::Horizontal, width)?,
        to_position(Axis::Vertical, top)?,
        to_position(Axis::Horizontal, left)?,
    ))
}

fn check_anchor_sides(opc: &Opc) -> Result<(), ConfigError> {
    for (field, anchor) in opc.anchors() {
        let vertical_field = matches!(field, "top" | "bottom" | "middle");
        if anchor.side.is_vertical() != vertical_field {
            return Err(ConfigError::InvalidAnchorSide {
                field,
                side: anchor.side,
            });
        }
    }
    Ok(())
}

/// Line or column an anchor points at, relative to the parent origin.
fn get_anchor(anchor: Anchor, parent: Dims, lookup: &dyn AnchorLookup) -> Result<i32, ConfigError> {
    let (top, left, height, width) = match anchor.target {
        AnchorTarget::Parent => (0, 0, parent.height as i32, parent.width as i32),
        target => {
            let rect = lookup
                .rect_of(target)
                .ok_or(ConfigError::UnknownAnchorTarget(target))?;
            (
                rect.top as i32,
                rect.left as i32,
                rect.height as i32,
                rect.width as i32,
            )
        }
    };

    let edge = match anchor.side {
        Side::Top => top,
        Side::Bottom => top + height,
        Side::Middle => top + height / 2,
        Side::Left => left,
        Side::Right => left + width,
        Side::Center => left + width / 2,
    };

    let axis = if anchor.side.is_vertical() { Axis::Vertical } else { Axis::Horizontal };
    checked_position(axis, edge.checked_add(anchor.pad), edge.saturating_add(anchor.pad))
}

/// Fails with `InvalidPosition` when the arithmetic producing a line overflowed.
fn checked_position(axis: Axis, value: Option<i32>, saturated: i32) -> Result<i32, ConfigError> {
    value.ok_or(ConfigError::InvalidPosition { axis, position: saturated })
}

fn required(anchor: Option<Anchor>, axis: Axis) -> Result<Anchor, ConfigError> {
    anchor.ok_or(ConfigError::Insufficient(axis))
}

fn size(value: Option<i32>, axis: Axis) -> Result<i32, ConfigError> {
    value.ok_or(ConfigError::Insufficient(axis))
}

/// Returns `(height, top)`.
fn resolve_vertical(opc: &Opc, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(i32, i32), ConfigError> {
    let axis = Axis::Vertical;

    match opc.vertical_mode() {
        VerticalMode::AnchorTopBottom => {
            let start = get_anchor(required(opc.top_anchor(), axis)?, parent, lookup)?;
            let end = get_anchor(required(opc.bottom_anchor(), axis)?, parent, lookup)?;
            span(axis, start, end)
        }
        VerticalMode::AnchorTopHeight => {
            let top = get_anchor(required(opc.top_anchor(), axis)?, parent, lookup)?;
            Ok((size(opc.explicit_height(), axis)?, top))
        }
        VerticalMode::AnchorBottomHeight => {
            let bottom = get_anchor(required(opc.bottom_anchor(), axis)?, parent, lookup)?;
            let height = size(opc.explicit_height(), axis)?;
            let top = checked_position(axis, bottom.checked_sub(height), bottom.saturating_sub(height))?;
            Ok((height, top))
        }
        VerticalMode::AnchorMiddleHeight => {
            let middle = get_anchor(required(opc.middle_anchor(), axis)?, parent, lookup)?;
            let height = size(opc.explicit_height(), axis)?;
            Ok((height, centered(middle, height)))
        }
        VerticalMode::TopHeight => {
            let height = size(opc.explicit_height(), axis)?;
            Ok((height, opc.explicit_top().unwrap_or(0)))
        }
        VerticalMode::Unknown => Err(ConfigError::Insufficient(axis)),
    }
}

/// Returns `(width, left)`.
fn resolve_horizontal(opc: &Opc, parent: Dims, lookup: &dyn AnchorLookup) -> Result<(i32, i32), ConfigError> {
    let axis = Axis::Horizontal;

    match opc.horizontal_mode() {
        HorizontalMode::AnchorLeftRight => {
            let start = get_anchor(required(opc.left_anchor(), axis)?, parent, lookup)?;
            let end = get_anchor(required(opc.right_anchor(), axis)?, parent, lookup)?;
            span(axis, start, end)
        }
        HorizontalMode::AnchorLeftWidth => {
            let left = get_anchor(required(opc.left_anchor(), axis)?, parent, lookup)?;
            Ok((size(opc.explicit_width(), axis)?, left))
        }
        HorizontalMode::AnchorRightWidth => {
            let right = get_anchor(required(opc.right_anchor(), axis)?, parent, lookup)?;
            let width = size(opc.explicit_width(), axis)?;
            let left = checked_position(axis, right.checked_sub(width), right.saturating_sub(width))?;
            Ok((width, left))
        }
        HorizontalMode::AnchorCenterWidth => {
            let center = get_anchor(required(opc.center_anchor(), axis)?, parent, lookup)?;
            let width = size(opc.explicit_width(), axis)?;
            Ok((width, centered(center, width)))
        }
        HorizontalMode::LeftWidth => {
            let width = size(opc.explicit_width(), axis)?;
            Ok((width, opc.explicit_left().unwrap_or(0)))
        }
        HorizontalMode::Unknown => Err(ConfigError::Insufficient(axis)),
    }
}

fn span(axis: Axis, start: i32, end: i32) -> Result<(i32, i32), ConfigError> {
    if end <= start {
        return Err(ConfigError::InvertedAnchors { axis, start, end });
    }
    let size = end
        .checked_sub(start)
        .ok_or(ConfigError::InvalidSize { axis, size: i32::MAX })?;
    Ok((size, start))
}

/// Start of a span of `size` centered on `line`, clamped at the parent origin.
fn centered(line: i32, size: i32) -> i32 {
    line.saturating_sub(size.div_euclid(2)).max(0)
}

fn to_size(axis: Axis, size: i32) -> Result<u16, ConfigError> {
    match u16::try_from(size) {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidSize { axis, size }),
    }
}

fn to_position(axis: Axis, position: i32) -> Result<u16, ConfigError> {
    u16::try_from(position).map_err(|_| ConfigError::InvalidPosition { axis, position })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WidgetId;
    use test_case::test_case;

    const PARENT: Dims = Dims::new(24, 80);

    fn resolve(opc: &Opc) -> Result<Rect, ConfigError> {
        compute_object_positioning(opc, PARENT, &NoSiblings)
    }

    #[test]
    fn test_fill_parent() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top))
            .anchor_bottom(Anchor::parent(Side::Bottom))
            .anchor_left(Anchor::parent(Side::Left))
            .anchor_right(Anchor::parent(Side::Right));
        assert_eq!(resolve(&opc), Ok(Rect::new(24, 80, 0, 0)));
    }

    #[test]
    fn test_padding_shrinks_span() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top).with_pad(1))
            .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(-1))
            .anchor_left(Anchor::parent(Side::Left).with_pad(2))
            .anchor_right(Anchor::parent(Side::Right).with_pad(-2));
        assert_eq!(resolve(&opc), Ok(Rect::new(22, 76, 1, 2)));
    }

    #[test]
    fn test_bottom_right_anchor_subtracts_size() {
        let opc = Opc::new()
            .anchor_bottom(Anchor::parent(Side::Bottom))
            .anchor_right(Anchor::parent(Side::Right))
            .height(4)
            .width(10);
        assert_eq!(resolve(&opc), Ok(Rect::new(4, 10, 20, 70)));
    }

    #[test_case(5, 11, 10, 35 ; "odd sizes floor the half")]
    #[test_case(4, 20, 10, 30 ; "even sizes")]
    fn test_centered(height: i32, width: i32, top: u16, left: u16) {
        let opc = Opc::new()
            .anchor_middle(Anchor::parent(Side::Middle))
            .anchor_center(Anchor::parent(Side::Center))
            .height(height)
            .width(width);
        let rect = resolve(&opc).unwrap();
        assert_eq!((rect.top, rect.left), (top, left));
    }

    #[test]
    fn test_center_clamps_at_origin() {
        let opc = Opc::new()
            .anchor_middle(Anchor::parent(Side::Top))
            .anchor_center(Anchor::parent(Side::Left))
            .height(6)
            .width(6);
        let rect = resolve(&opc).unwrap();
        assert_eq!((rect.top, rect.left), (0, 0));
    }

    #[test]
    fn test_size_only_defaults_to_origin() {
        let opc = Opc::new().height(3).width(7);
        assert_eq!(resolve(&opc), Ok(Rect::new(3, 7, 0, 0)));
    }

    #[test]
    fn test_single_anchor_without_size_fails() {
        let opc = Opc::new().anchor_top(Anchor::parent(Side::Top)).width(5);
        assert_eq!(resolve(&opc), Err(ConfigError::Insufficient(Axis::Vertical)));
    }

    #[test]
    fn test_inverted_anchors_fail() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Bottom))
            .anchor_bottom(Anchor::parent(Side::Top))
            .width(5);
        assert!(matches!(
            resolve(&opc),
            Err(ConfigError::InvertedAnchors { axis: Axis::Vertical, .. })
        ));
    }

    #[test]
    fn test_wrong_axis_side_fails() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Left))
            .height(2)
            .width(2);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::InvalidAnchorSide {
                field: "top",
                side: Side::Left
            })
        );
    }

    #[test]
    fn test_negative_position_fails() {
        let opc = Opc::new()
            .anchor_bottom(Anchor::parent(Side::Top))
            .height(3)
            .width(3);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::InvalidPosition {
                axis: Axis::Vertical,
                position: -3
            })
        );
    }

    #[test_case(Opc::new().anchor_top(Anchor::parent(Side::Bottom).with_pad(i32::MAX)).height(1), i32::MAX ; "pad past the far edge")]
    #[test_case(Opc::new().anchor_top(Anchor::parent(Side::Top).with_pad(i32::MIN)).height(1), i32::MIN ; "pad before the origin")]
    #[test_case(Opc::new().anchor_bottom(Anchor::parent(Side::Bottom)).height(i32::MIN), i32::MAX ; "bottom minus huge negative height")]
    fn test_extreme_values_fail_without_overflow(opc: Opc, position: i32) {
        let opc = opc.left(0).width(1);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::InvalidPosition {
                axis: Axis::Vertical,
                position
            })
        );
    }

    #[test]
    fn test_span_overflow_fails() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top).with_pad(-10))
            .anchor_bottom(Anchor::parent(Side::Bottom).with_pad(i32::MAX - 24))
            .width(1);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::InvalidSize {
                axis: Axis::Vertical,
                size: i32::MAX
            })
        );
    }

    #[test]
    fn test_zero_size_fails() {
        let opc = Opc::new().height(0).width(3);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::InvalidSize {
                axis: Axis::Vertical,
                size: 0
            })
        );
    }

    #[test]
    fn test_sibling_anchor_reads_sibling_rect() {
        let sibling = WidgetId::next();
        let lookup = move |target: AnchorTarget| match target {
            AnchorTarget::Widget(id) if id == sibling => Some(Rect::new(2, 10, 3, 4)),
            _ => None,
        };

        let opc = Opc::new()
            .anchor_top(Anchor::widget(sibling, Side::Bottom).with_pad(1))
            .anchor_left(Anchor::widget(sibling, Side::Left))
            .height(1)
            .width(10);
        assert_eq!(
            compute_object_positioning(&opc, PARENT, &lookup),
            Ok(Rect::new(1, 10, 6, 4))
        );
    }

    #[test]
    fn test_unknown_sibling_fails() {
        let missing = WidgetId::next();
        let opc = Opc::new()
            .anchor_top(Anchor::widget(missing, Side::Bottom))
            .height(1)
            .width(1);
        assert_eq!(
            resolve(&opc),
            Err(ConfigError::UnknownAnchorTarget(AnchorTarget::Widget(missing)))
        );
    }
}
