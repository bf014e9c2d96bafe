//! Tooltip placement and the single-active-tooltip state machine.
//!
//! The controller is independent of any UI toolkit: geometry comes in through
//! [`Layout`], and every operation returns the visual changes the caller has
//! to apply (toggle the `active` tag, set the `top`/`bottom` tag).

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::warn;

/// Minimum distance kept between a tooltip and the viewport edges.
pub const VIEWPORT_MARGIN: f64 = 10.0;
/// Space between the tooltip and its day cell.
pub const TOOLTIP_GAP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Bottom,
}

impl Vertical {
    pub fn css_class(self) -> &'static str {
        match self {
            Vertical::Top => "top",
            Vertical::Bottom => "bottom",
        }
    }
}

/// Tag carried by the tooltip that is currently showing.
pub const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    /// Centered on the cell.
    Center,
    /// Right edge pinned half a cell in from the cell's right edge.
    AlignRight,
    /// Left edge pinned half a cell in from the cell's left edge.
    AlignLeft,
}

impl Horizontal {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Horizontal::Center => None,
            Horizontal::AlignRight => Some("align-right"),
            Horizontal::AlignLeft => Some("align-left"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
    /// Where the tooltip ends up once both axes are resolved.
    pub rect: Rect,
}

/// Places a tooltip of `tooltip` size around `cell`.
///
/// The tooltip is first put above the cell, centered. That tentative box is
/// checked against the viewport: a right overflow anchors it to the cell's
/// right side, a left overflow to the cell's left side (the left check is
/// applied last), and a box hanging off the top or bottom flips it below the
/// cell.
pub fn placement(cell: Rect, tooltip: Size, viewport: Size) -> Placement {
    let tentative = Rect::new(
        cell.center_x() - tooltip.width / 2.0,
        cell.top - TOOLTIP_GAP - tooltip.height,
        tooltip.width,
        tooltip.height,
    );

    let mut horizontal = Horizontal::Center;
    if tentative.right() > viewport.width - VIEWPORT_MARGIN {
        horizontal = Horizontal::AlignRight;
    }
    if tentative.left < VIEWPORT_MARGIN {
        horizontal = Horizontal::AlignLeft;
    }

    let vertical = if tentative.bottom() > viewport.height - VIEWPORT_MARGIN
        || tentative.top < VIEWPORT_MARGIN
    {
        Vertical::Bottom
    } else {
        Vertical::Top
    };

    let half_cell = cell.width / 2.0;
    let left = match horizontal {
        Horizontal::Center => tentative.left,
        Horizontal::AlignRight => cell.right() - half_cell - tooltip.width,
        Horizontal::AlignLeft => cell.left + half_cell,
    };
    let top = match vertical {
        Vertical::Top => tentative.top,
        Vertical::Bottom => cell.bottom() + TOOLTIP_GAP,
    };

    Placement {
        vertical,
        horizontal,
        rect: Rect::new(left, top, tooltip.width, tooltip.height),
    }
}

/// Geometry provider for the rendered calendar.
pub trait Layout {
    fn viewport(&self) -> Size;
    fn cell_rect(&self, date: NaiveDate) -> Option<Rect>;
    /// Measured size of the tooltip for `date`; it depends on its content.
    fn tooltip_size(&self, date: NaiveDate) -> Option<Size>;
    /// The day cell under `point`, whether or not it carries a tooltip.
    fn hit_test(&self, point: Point) -> Option<NaiveDate>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TooltipChange {
    Activated { date: NaiveDate, placement: Placement },
    Deactivated { date: NaiveDate },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveTooltip {
    date: NaiveDate,
    placement: Placement,
}

/// Owns the one piece of interactive state: which tooltip is showing.
#[derive(Debug, Default)]
pub struct TooltipController {
    registered: BTreeSet<NaiveDate>,
    active: Option<ActiveTooltip>,
}

impl TooltipController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, date: NaiveDate) {
        self.registered.insert(date);
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn is_registered(&self, date: NaiveDate) -> bool {
        self.registered.contains(&date)
    }

    pub fn active(&self) -> Option<NaiveDate> {
        self.active.map(|active| active.date)
    }

    pub fn active_placement(&self) -> Option<Placement> {
        self.active.map(|active| active.placement)
    }

    /// Hover only shows a tooltip when nothing else is showing.
    pub fn hover_enter(&mut self, date: NaiveDate, layout: &impl Layout) -> Vec<TooltipChange> {
        if self.active.is_some() || !self.is_registered(date) {
            return Vec::new();
        }
        self.activate(date, layout).into_iter().collect()
    }

    pub fn hover_leave(&mut self, date: NaiveDate) -> Vec<TooltipChange> {
        if self.active() == Some(date) {
            return self.deactivate().into_iter().collect();
        }
        Vec::new()
    }

    /// Switches to `date`'s tooltip, or hides it if it is already showing.
    pub fn tap(&mut self, date: NaiveDate, layout: &impl Layout) -> Vec<TooltipChange> {
        if !self.is_registered(date) {
            return Vec::new();
        }

        let mut changes = Vec::new();
        if self.active() == Some(date) {
            changes.extend(self.deactivate());
            return changes;
        }

        changes.extend(self.deactivate());
        changes.extend(self.activate(date, layout));
        changes
    }

    /// Clears the active tooltip when `point` lies outside every day cell.
    pub fn background_click(&mut self, point: Point, layout: &impl Layout) -> Vec<TooltipChange> {
        if self.active.is_none() || layout.hit_test(point).is_some() {
            return Vec::new();
        }
        self.deactivate().into_iter().collect()
    }

    /// Routes a pointer click: a day cell with a tooltip gets a tap, any other
    /// day cell swallows the click, and everything else is background.
    pub fn click(&mut self, point: Point, layout: &impl Layout) -> Vec<TooltipChange> {
        match layout.hit_test(point) {
            Some(date) if self.is_registered(date) => self.tap(date, layout),
            Some(_) => Vec::new(),
            None => self.background_click(point, layout),
        }
    }

    fn activate(&mut self, date: NaiveDate, layout: &impl Layout) -> Option<TooltipChange> {
        let (Some(cell), Some(size)) = (layout.cell_rect(date), layout.tooltip_size(date)) else {
            warn!("no layout for tooltip {date}, leaving it hidden");
            return None;
        };
        let placement = placement(cell, size, layout.viewport());
        self.active = Some(ActiveTooltip { date, placement });
        Some(TooltipChange::Activated { date, placement })
    }

    fn deactivate(&mut self) -> Option<TooltipChange> {
        self.active
            .take()
            .map(|active| TooltipChange::Deactivated { date: active.date })
    }
}
