//! Object positioning configuration (OPC).
//!
//! An OPC is the partial geometry description of one window or widget:
//! up to six anchors, explicit top/left coordinates and explicit sizes.
//! Every setter re-classifies the configuration, so the vertical and
//! horizontal modes always describe what was supplied.
//!
//! # Example
//!
//! ```ignore
//! use termwin::layout::{Anchor, Opc, Side};
//!
//! // Fill the parent horizontally, 3 rows tall, 1 row below the top.
//! let opc = Opc::new()
//!     .anchor_top(Anchor::parent(Side::Top).with_pad(1))
//!     .anchor_left(Anchor::parent(Side::Left))
//!     .anchor_right(Anchor::parent(Side::Right))
//!     .height(3);
//! ```

use std::fmt;

use super::anchor::Anchor;

/// Which combination of vertical inputs was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalMode {
    /// Top and bottom anchors; height is their distance.
    AnchorTopBottom,
    AnchorTopHeight,
    AnchorBottomHeight,
    AnchorMiddleHeight,
    /// Explicit top (0 when omitted) and height.
    TopHeight,
    #[default]
    Unknown,
}

/// Which combination of horizontal inputs was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalMode {
    /// Left and right anchors; width is their distance.
    AnchorLeftRight,
    AnchorLeftWidth,
    AnchorRightWidth,
    AnchorCenterWidth,
    /// Explicit left (0 when omitted) and width.
    LeftWidth,
    #[default]
    Unknown,
}

/// Positioning configuration of one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPositioningConfiguration {
    anchor_top: Option<Anchor>,
    anchor_bottom: Option<Anchor>,
    anchor_middle: Option<Anchor>,
    anchor_left: Option<Anchor>,
    anchor_right: Option<Anchor>,
    anchor_center: Option<Anchor>,

    top: Option<i32>,
    left: Option<i32>,
    height: Option<i32>,
    width: Option<i32>,

    vertical: VerticalMode,
    horizontal: HorizontalMode,
}

/// Short alias used throughout the crate.
pub type Opc = ObjectPositioningConfiguration;

impl ObjectPositioningConfiguration {
    /// Empty configuration. Both modes are `Unknown` until enough is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit rectangle, no anchors.
    pub fn fixed(height: i32, width: i32, top: i32, left: i32) -> Self {
        Self::new().height(height).width(width).top(top).left(left)
    }

    // -------------------------------------------------------------------------
    // Builder setters
    // -------------------------------------------------------------------------

    pub fn anchor_top(mut self, anchor: Anchor) -> Self {
        self.anchor_top = Some(anchor);
        self.classify()
    }

    pub fn anchor_bottom(mut self, anchor: Anchor) -> Self {
        self.anchor_bottom = Some(anchor);
        self.classify()
    }

    pub fn anchor_middle(mut self, anchor: Anchor) -> Self {
        self.anchor_middle = Some(anchor);
        self.classify()
    }

    pub fn anchor_left(mut self, anchor: Anchor) -> Self {
        self.anchor_left = Some(anchor);
        self.classify()
    }

    pub fn anchor_right(mut self, anchor: Anchor) -> Self {
        self.anchor_right = Some(anchor);
        self.classify()
    }

    pub fn anchor_center(mut self, anchor: Anchor) -> Self {
        self.anchor_center = Some(anchor);
        self.classify()
    }

    pub fn top(mut self, top: i32) -> Self {
        self.top = Some(top);
        self.classify()
    }

    pub fn left(mut self, left: i32) -> Self {
        self.left = Some(left);
        self.classify()
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self.classify()
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self.classify()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn vertical_mode(&self) -> VerticalMode {
        self.vertical
    }

    pub fn horizontal_mode(&self) -> HorizontalMode {
        self.horizontal
    }

    pub fn top_anchor(&self) -> Option<Anchor> {
        self.anchor_top
    }

    pub fn bottom_anchor(&self) -> Option<Anchor> {
        self.anchor_bottom
    }

    pub fn middle_anchor(&self) -> Option<Anchor> {
        self.anchor_middle
    }

    pub fn left_anchor(&self) -> Option<Anchor> {
        self.anchor_left
    }

    pub fn right_anchor(&self) -> Option<Anchor> {
        self.anchor_right
    }

    pub fn center_anchor(&self) -> Option<Anchor> {
        self.anchor_center
    }

    pub fn explicit_top(&self) -> Option<i32> {
        self.top
    }

    pub fn explicit_left(&self) -> Option<i32> {
        self.left
    }

    pub fn explicit_height(&self) -> Option<i32> {
        self.height
    }

    pub fn explicit_width(&self) -> Option<i32> {
        self.width
    }

    /// All anchors with the name of the field holding them.
    pub fn anchors(&self) -> impl Iterator<Item = (&'static str, Anchor)> + '_ {
        [
            ("top", self.anchor_top),
            ("bottom", self.anchor_bottom),
            ("middle", self.anchor_middle),
            ("left", self.anchor_left),
            ("right", self.anchor_right),
            ("center", self.anchor_center),
        ]
        .into_iter()
        .filter_map(|(field, anchor)| anchor.map(|a| (field, a)))
    }

    // -------------------------------------------------------------------------
    // Classification
    // -------------------------------------------------------------------------

    fn classify(mut self) -> Self {
        self.vertical = self.process_vertical_info();
        self.horizontal = self.process_horizontal_info();
        self
    }

    fn process_vertical_info(&self) -> VerticalMode {
        let anchored = self.anchor_top.is_some()
            || self.anchor_bottom.is_some()
            || self.anchor_middle.is_some();

        match (self.anchor_top, self.anchor_bottom, self.anchor_middle, self.height) {
            (Some(_), Some(_), _, _) => VerticalMode::AnchorTopBottom,
            (Some(_), None, _, Some(_)) => VerticalMode::AnchorTopHeight,
            (None, Some(_), _, Some(_)) => VerticalMode::AnchorBottomHeight,
            (None, None, Some(_), Some(_)) => VerticalMode::AnchorMiddleHeight,
            (_, _, _, Some(_)) if !anchored => VerticalMode::TopHeight,
            _ => VerticalMode::Unknown,
        }
    }

    fn process_horizontal_info(&self) -> HorizontalMode {
        let anchored = self.anchor_left.is_some()
            || self.anchor_right.is_some()
            || self.anchor_center.is_some();

        match (self.anchor_left, self.anchor_right, self.anchor_center, self.width) {
            (Some(_), Some(_), _, _) => HorizontalMode::AnchorLeftRight,
            (Some(_), None, _, Some(_)) => HorizontalMode::AnchorLeftWidth,
            (None, Some(_), _, Some(_)) => HorizontalMode::AnchorRightWidth,
            (None, None, Some(_), Some(_)) => HorizontalMode::AnchorCenterWidth,
            (_, _, _, Some(_)) if !anchored => HorizontalMode::LeftWidth,
            _ => HorizontalMode::Unknown,
        }
    }
}

fn write_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, value: Option<T>) -> fmt::Result {
    if let Some(value) = value {
        write!(f, " {name}={value}")?;
    }
    Ok(())
}

impl fmt::Display for ObjectPositioningConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "opc[{:?}/{:?}", self.vertical, self.horizontal)?;
        write_opt(f, "atop", self.anchor_top)?;
        write_opt(f, "abottom", self.anchor_bottom)?;
        write_opt(f, "amiddle", self.anchor_middle)?;
        write_opt(f, "aleft", self.anchor_left)?;
        write_opt(f, "aright", self.anchor_right)?;
        write_opt(f, "acenter", self.anchor_center)?;
        write_opt(f, "top", self.top)?;
        write_opt(f, "left", self.left)?;
        write_opt(f, "height", self.height)?;
        write_opt(f, "width", self.width)?;
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Side;

    #[test]
    fn test_empty_is_unknown() {
        let opc = Opc::new();
        assert_eq!(opc.vertical_mode(), VerticalMode::Unknown);
        assert_eq!(opc.horizontal_mode(), HorizontalMode::Unknown);
    }

    #[test]
    fn test_opposing_anchors_win_over_size() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top))
            .anchor_bottom(Anchor::parent(Side::Bottom))
            .height(4);
        assert_eq!(opc.vertical_mode(), VerticalMode::AnchorTopBottom);
    }

    #[test]
    fn test_single_anchor_without_size_is_unknown() {
        let opc = Opc::new()
            .anchor_top(Anchor::parent(Side::Top))
            .anchor_left(Anchor::parent(Side::Left));
        assert_eq!(opc.vertical_mode(), VerticalMode::Unknown);
        assert_eq!(opc.horizontal_mode(), HorizontalMode::Unknown);
    }

    #[test]
    fn test_size_only_falls_back_to_origin() {
        let opc = Opc::new().height(3).width(8);
        assert_eq!(opc.vertical_mode(), VerticalMode::TopHeight);
        assert_eq!(opc.horizontal_mode(), HorizontalMode::LeftWidth);
    }

    #[test]
    fn test_center_anchor_modes() {
        let opc = Opc::new()
            .anchor_middle(Anchor::parent(Side::Middle))
            .anchor_center(Anchor::parent(Side::Center))
            .height(2)
            .width(6);
        assert_eq!(opc.vertical_mode(), VerticalMode::AnchorMiddleHeight);
        assert_eq!(opc.horizontal_mode(), HorizontalMode::AnchorCenterWidth);
    }

    #[test]
    fn test_anchor_plus_explicit_position_is_unknown() {
        // right anchor + explicit left, no width: not an enumerated case
        let opc = Opc::new().anchor_right(Anchor::parent(Side::Right)).left(2);
        assert_eq!(opc.horizontal_mode(), HorizontalMode::Unknown);
    }

    #[test]
    fn test_display_summary() {
        let opc = Opc::fixed(2, 3, 4, 5);
        let s = opc.to_string();
        assert!(s.starts_with("opc[TopHeight/LeftWidth"));
        assert!(s.contains("height=2"));
        assert!(s.contains("left=5"));
    }
}
