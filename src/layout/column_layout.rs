//! Resolved column geometry.
//!
//! Applies the order / hidden / width overlays to the configured columns,
//! splits them into frozen-left, scrollable and frozen-right panels and
//! pre-computes per-column offsets so span widths can be aggregated cheaply.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::error::{Result, TableError};
use crate::types::{Column, FrozenSide, ViewState};

/// Narrowest width any column may resolve to, in pixels
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

/// Width used when nothing else applies, in pixels
pub const DEFAULT_COLUMN_WIDTH: f32 = 100.0;

/// Panel a visible column renders in
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Panel {
    Left,
    Scrollable,
    Right,
}

impl Panel {
    pub fn of(column: &Column) -> Self {
        match column.frozen {
            Some(FrozenSide::Left) => Self::Left,
            Some(FrozenSide::Right) => Self::Right,
            None => Self::Scrollable,
        }
    }
}

/// Width of a cell or merged region
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CellWidth {
    Fixed { px: f32 },
    /// Covers the fillspace column; `min` is its resolved pixel width
    Flexible { min: f32 },
}

impl CellWidth {
    pub fn px(self) -> f32 {
        match self {
            Self::Fixed { px } => px,
            Self::Flexible { min } => min,
        }
    }

    pub fn is_flexible(self) -> bool {
        matches!(self, Self::Flexible { .. })
    }
}

/// Geometry of one visible column
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGeometry {
    pub id: String,
    pub panel: Panel,
    /// Final width in pixels
    pub width: f32,
    /// Left edge within its panel
    pub left: f32,
    /// Left edge across the whole row (left panel, then scrollable, then right)
    pub x: f32,
    /// True for the single column absorbing leftover space
    pub flexible: bool,
}

/// Pixel width of each panel
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PanelBounds {
    pub left: f32,
    pub scrollable: f32,
    pub right: f32,
}

impl PanelBounds {
    pub fn total(&self) -> f32 {
        self.left + self.scrollable + self.right
    }
}

/// Overlay inputs to [`resolve_layout`]
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub order: Option<&'a [String]>,
    pub hidden: &'a BTreeSet<String>,
    /// Manual resize overrides
    pub widths: &'a BTreeMap<String, f32>,
    /// Auto-fit measurements, consulted only for columns with `adjust`
    pub measured: &'a HashMap<String, f32>,
    /// Container width, when known, for fillspace growth
    pub container_width: Option<f32>,
}

impl<'a> LayoutInput<'a> {
    pub fn from_state(
        state: &'a ViewState,
        measured: &'a HashMap<String, f32>,
        container_width: Option<f32>,
    ) -> Self {
        Self {
            order: state.column_order.as_deref(),
            hidden: &state.hidden,
            widths: &state.widths,
            measured,
            container_width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub fallback_width: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            fallback_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Resolved column layout
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLayout {
    /// Visible columns in rendered order: left, scrollable, right
    pub columns: Vec<ColumnGeometry>,
    pub panels: PanelBounds,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ColumnLayout {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a visible column in rendered order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&ColumnGeometry> {
        self.position(id).and_then(|i| self.columns.get(i))
    }

    pub fn width_of(&self, id: &str) -> Option<f32> {
        self.get(id).map(|g| g.width)
    }

    pub fn panel(&self, panel: Panel) -> impl Iterator<Item = &ColumnGeometry> {
        self.columns.iter().filter(move |g| g.panel == panel)
    }

    pub fn frozen_left(&self) -> impl Iterator<Item = &ColumnGeometry> {
        self.panel(Panel::Left)
    }

    pub fn scrollable(&self) -> impl Iterator<Item = &ColumnGeometry> {
        self.panel(Panel::Scrollable)
    }

    pub fn frozen_right(&self) -> impl Iterator<Item = &ColumnGeometry> {
        self.panel(Panel::Right)
    }

    pub fn has_frozen(&self) -> bool {
        self.columns.iter().any(|g| g.panel != Panel::Scrollable)
    }

    pub fn fillspace(&self) -> Option<&ColumnGeometry> {
        self.columns.iter().find(|g| g.flexible)
    }

    pub fn total_width(&self) -> f32 {
        self.panels.total()
    }

    /// Aggregate width of `count` columns starting at rendered position
    /// `start`, clipped to the last column.
    pub fn span_width(&self, start: usize, count: usize) -> CellWidth {
        let covered = self.columns.iter().skip(start).take(count);
        let mut px = 0.0;
        let mut flexible = false;
        for g in covered {
            px += g.width;
            flexible |= g.flexible;
        }
        if flexible {
            CellWidth::Flexible { min: px }
        } else {
            CellWidth::Fixed { px }
        }
    }
}

/// Clamp a width to the column's bounds.
///
/// The lower bound never drops below [`MIN_COLUMN_WIDTH`]; when the
/// configured maximum is below the minimum, the minimum wins.
pub fn clamp_width(column: &Column, px: f32) -> f32 {
    let min = column
        .min_width
        .map_or(MIN_COLUMN_WIDTH, |m| m.max(MIN_COLUMN_WIDTH));
    let max = column.max_width.map_or(f32::INFINITY, |m| m.max(min));
    let px = if px.is_finite() { px } else { min };
    px.clamp(min, max)
}

/// Pick a column width by priority, then clamp it.
///
/// Resize override, then auto-fit measurement (only when the column asks
/// for one), then configured width, then the fallback.
pub fn resolve_width(
    column: &Column,
    override_px: Option<f32>,
    measured_px: Option<f32>,
    fallback: f32,
) -> f32 {
    let measured = column.adjust.and(measured_px);
    let px = override_px
        .or(measured)
        .or(column.width)
        .unwrap_or(fallback);
    clamp_width(column, px)
}

/// Configured columns in overlay order.
///
/// Without an overlay the configured order is used. With one, columns the
/// overlay omits are dropped, unknown ids are ignored and a repeated id
/// keeps its first position.
pub fn effective_order<'a>(columns: &'a [Column], overlay: Option<&[String]>) -> Vec<&'a Column> {
    let Some(ids) = overlay else {
        return columns.iter().collect();
    };
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| columns.iter().find(|c| &c.id == id))
        .collect()
}

/// Resolve order, visibility, panels and widths for a column set.
///
/// # Errors
/// Returns [`TableError::NoColumns`] when `columns` is empty.
pub fn resolve_layout(
    columns: &[Column],
    input: &LayoutInput<'_>,
    options: &LayoutOptions,
) -> Result<ColumnLayout> {
    if columns.is_empty() {
        return Err(TableError::NoColumns);
    }

    let visible: Vec<&Column> = effective_order(columns, input.order)
        .into_iter()
        .filter(|c| !c.hidden && !input.hidden.contains(&c.id))
        .collect();

    // Rendered order: each panel keeps the relative effective order
    let mut ordered: Vec<&Column> = Vec::with_capacity(visible.len());
    for panel in [Panel::Left, Panel::Scrollable, Panel::Right] {
        ordered.extend(visible.iter().copied().filter(|c| Panel::of(c) == panel));
    }

    // Only the first fillspace column in effective order grows
    let fill_id = visible.iter().find(|c| c.fillspace).map(|c| c.id.as_str());

    let mut widths: Vec<f32> = ordered
        .iter()
        .map(|c| {
            resolve_width(
                c,
                input.widths.get(&c.id).copied(),
                input.measured.get(&c.id).copied(),
                options.fallback_width,
            )
        })
        .collect();

    if let (Some(container), Some(fill_id)) = (input.container_width, fill_id) {
        let total: f32 = widths.iter().sum();
        let slack = container - total;
        if slack > 0.0 {
            let slot = ordered
                .iter()
                .zip(widths.iter_mut())
                .find(|(c, _)| c.id == fill_id);
            if let Some((column, width)) = slot {
                *width = clamp_width(column, *width + slack);
            }
        }
    }

    let mut panels = PanelBounds::default();
    let mut geometry = Vec::with_capacity(ordered.len());
    let mut index = HashMap::with_capacity(ordered.len());
    let mut x = 0.0;

    for (pos, (column, width)) in ordered.iter().zip(widths).enumerate() {
        let panel = Panel::of(column);
        let panel_width = match panel {
            Panel::Left => &mut panels.left,
            Panel::Scrollable => &mut panels.scrollable,
            Panel::Right => &mut panels.right,
        };
        geometry.push(ColumnGeometry {
            id: column.id.clone(),
            panel,
            width,
            left: *panel_width,
            x,
            flexible: fill_id == Some(column.id.as_str()),
        });
        index.insert(column.id.clone(), pos);
        *panel_width += width;
        x += width;
    }

    Ok(ColumnLayout {
        columns: geometry,
        panels,
        index,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::AutoFit;

    fn resolve(columns: &[Column]) -> ColumnLayout {
        let state = ViewState::default();
        let measured = HashMap::new();
        resolve_layout(
            columns,
            &LayoutInput::from_state(&state, &measured, None),
            &LayoutOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_no_columns_is_an_error() {
        let state = ViewState::default();
        let measured = HashMap::new();
        let result = resolve_layout(
            &[],
            &LayoutInput::from_state(&state, &measured, None),
            &LayoutOptions::default(),
        );
        assert!(matches!(result, Err(TableError::NoColumns)));
    }

    #[test]
    fn test_offsets_accumulate() {
        let layout = resolve(&[
            Column::new("a").width(50.0),
            Column::new("b"),
            Column::new("c").width(70.0),
        ]);
        let xs: Vec<f32> = layout.columns.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![0.0, 50.0, 150.0]);
        assert_eq!(layout.total_width(), 220.0);
        assert_eq!(layout.position("c"), Some(2));
    }

    #[test]
    fn test_width_priority() {
        let column = Column::new("a").width(80.0).adjust(AutoFit::Data);
        assert_eq!(resolve_width(&column, Some(120.0), Some(90.0), 100.0), 120.0);
        assert_eq!(resolve_width(&column, None, Some(90.0), 100.0), 90.0);
        assert_eq!(resolve_width(&column, None, None, 100.0), 80.0);
        let bare = Column::new("b");
        assert_eq!(resolve_width(&bare, None, None, 100.0), 100.0);
    }

    #[test]
    fn test_measurement_ignored_without_adjust() {
        let column = Column::new("a").width(80.0);
        assert_eq!(resolve_width(&column, None, Some(300.0), 100.0), 80.0);
    }

    #[test]
    fn test_clamp_floor_and_bounds() {
        let column = Column::new("a").min_width(5.0).max_width(200.0);
        assert_eq!(clamp_width(&column, 1.0), MIN_COLUMN_WIDTH);
        assert_eq!(clamp_width(&column, 500.0), 200.0);
        let inverted = Column::new("b").min_width(80.0).max_width(40.0);
        assert_eq!(clamp_width(&inverted, 10.0), 80.0);
        assert_eq!(clamp_width(&Column::new("c"), -30.0), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_max_at_or_below_min_pins_width() {
        let fixed = Column::new("a").min_width(50.0).max_width(50.0);
        assert_eq!(clamp_width(&fixed, 100.0), 50.0);
        assert_eq!(clamp_width(&fixed, 10.0), 50.0);

        let inverted = Column::new("b").min_width(80.0).max_width(40.0);
        assert_eq!(clamp_width(&inverted, 500.0), 80.0);

        let tiny = Column::new("c").max_width(10.0);
        assert_eq!(clamp_width(&tiny, 500.0), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_frozen_partition_keeps_relative_order() {
        let layout = resolve(&[
            Column::new("a"),
            Column::new("r1").frozen(FrozenSide::Right),
            Column::new("l1").frozen(FrozenSide::Left),
            Column::new("b"),
            Column::new("l2").frozen(FrozenSide::Left),
        ]);
        let ids: Vec<&str> = layout.columns.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2", "a", "b", "r1"]);
        let right = layout.frozen_right().next().unwrap();
        assert_eq!(right.left, 0.0);
        assert_eq!(right.x, 400.0);
        assert_eq!(layout.panels.left, 200.0);
        assert!(layout.has_frozen());
    }

    #[test]
    fn test_span_width_reports_flexible() {
        let layout = resolve(&[
            Column::new("a").width(40.0),
            Column::new("b").width(60.0).fillspace(),
            Column::new("c").width(30.0),
        ]);
        assert_eq!(layout.span_width(0, 1), CellWidth::Fixed { px: 40.0 });
        assert_eq!(layout.span_width(0, 2), CellWidth::Flexible { min: 100.0 });
        assert_eq!(layout.span_width(2, 5), CellWidth::Fixed { px: 30.0 });
    }
}
