//! Responsive tray layout.
//!
//! Given the trays of the current puzzle, the width of their container and
//! the viewport class, decide per tray how many columns to use (1, 2 or 4)
//! and a uniform piece width sized to that tray's longest label.
//!
//! Rule matrix, by tray count:
//!
//! | trays | rule |
//! |---|---|
//! | 1 | widest of 4 / 2 / 1 columns that fits the container |
//! | 2 | both 2 columns if the two trays fit side by side, else both 1 |
//! | 3 | the singleton uses the 1-tray rule, the pair the 2-tray rule |
//! | 4 | wide: all 1 column; compact: all 2 columns |
//!
//! A pair always shares its column count so stem and ending stay aligned.

use serde::{Deserialize, Serialize};

use crate::api::types::Viewport;
use crate::components::tray::CandidateGroup;
use crate::systems::text::{FontSpec, TextMeasure};

/// Number of grid columns a tray renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Columns {
    One = 1,
    Two = 2,
    Four = 4,
}

impl Columns {
    pub fn count(self) -> u32 {
        self as u32
    }
}

impl From<Columns> for u8 {
    fn from(c: Columns) -> u8 {
        c as u8
    }
}

impl TryFrom<u8> for Columns {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Columns::One),
            2 => Ok(Columns::Two),
            4 => Ok(Columns::Four),
            other => Err(format!("unsupported column count {}", other)),
        }
    }
}

/// Layout of one tray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrayLayout {
    pub columns: Columns,
    pub piece_width_px: f32,
}

/// One entry per input group, in input order.
pub type LayoutPlan = Vec<TrayLayout>;

/// Calibration for one viewport class. Must match the view's CSS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewportMetrics {
    /// Font used to render piece labels.
    pub font: FontSpec,
    /// Internal margins of a piece around its label.
    pub padding_px: f32,
    /// Extra lateral clearance for an exposed connector knob/socket.
    pub connector_px: f32,
    /// Touch-target floor for a piece.
    pub min_width_px: f32,
    /// Gap between pieces in a tray, and between trays.
    pub gap_px: f32,
    /// Horizontal padding of a tray around its grid.
    pub tray_padding_px: f32,
}

impl ViewportMetrics {
    pub fn compact() -> Self {
        Self {
            font: FontSpec::new(14.0),
            padding_px: 20.0,
            connector_px: 8.0,
            min_width_px: 55.0,
            gap_px: 12.0,
            tray_padding_px: 12.0,
        }
    }

    pub fn wide() -> Self {
        Self {
            font: FontSpec::new(20.0),
            padding_px: 64.0,
            connector_px: 16.0,
            min_width_px: 120.0,
            gap_px: 16.0,
            tray_padding_px: 32.0,
        }
    }

    /// Uniform piece width for a tray whose longest label measures `max_label_px`.
    pub fn piece_width(&self, max_label_px: f32, show_connectors: bool) -> f32 {
        let connector = if show_connectors { self.connector_px } else { 0.0 };
        (max_label_px + self.padding_px + connector).max(self.min_width_px)
    }

    /// Width of a row of `cols` pieces, gaps included.
    fn row_width(&self, cols: Columns, piece_width: f32) -> f32 {
        let n = cols.count() as f32;
        n * piece_width + (n - 1.0) * self.gap_px
    }

    /// Visual width of a whole tray laid out with `cols` columns.
    fn tray_width(&self, cols: Columns, piece_width: f32) -> f32 {
        self.tray_padding_px + self.row_width(cols, piece_width)
    }
}

impl Default for ViewportMetrics {
    fn default() -> Self {
        Self::wide()
    }
}

/// Layout calibration for both viewport classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Viewport widths at or above this are `Wide`.
    pub breakpoint_px: f32,
    pub compact: ViewportMetrics,
    pub wide: ViewportMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 640.0,
            compact: ViewportMetrics::compact(),
            wide: ViewportMetrics::wide(),
        }
    }
}

impl LayoutConfig {
    pub fn metrics(&self, viewport: Viewport) -> &ViewportMetrics {
        match viewport {
            Viewport::Compact => &self.compact,
            Viewport::Wide => &self.wide,
        }
    }

    pub fn classify(&self, viewport_width_px: f32) -> Viewport {
        Viewport::classify(viewport_width_px, self.breakpoint_px)
    }
}

/// Compute the layout plan for `groups` inside a container `container_width_px` wide.
pub fn compute_layout<M: TextMeasure + ?Sized>(
    groups: &[CandidateGroup],
    container_width_px: f32,
    viewport: Viewport,
    config: &LayoutConfig,
    measure: &mut M,
) -> LayoutPlan {
    if groups.is_empty() {
        return Vec::new();
    }
    let metrics = config.metrics(viewport);

    let widths: Vec<f32> = groups
        .iter()
        .map(|group| {
            let max_label = group
                .labels
                .iter()
                .map(|label| measure.measure(label, &metrics.font))
                .fold(0.0_f32, f32::max);
            metrics.piece_width(max_label, group.show_connectors)
        })
        .collect();

    let columns: Vec<Columns> = match groups.len() {
        1 => vec![single_columns(metrics, widths[0], container_width_px)],
        2 => {
            let cols = pair_columns(metrics, widths[0], widths[1], container_width_px);
            vec![cols, cols]
        }
        3 => {
            // The pair is the two adjacent trays of the same unit (auxiliary or verb).
            let pair_first = groups[0].slot.is_auxiliary() == groups[1].slot.is_auxiliary();
            if pair_first {
                let pair = pair_columns(metrics, widths[0], widths[1], container_width_px);
                let solo = single_columns(metrics, widths[2], container_width_px);
                vec![pair, pair, solo]
            } else {
                let solo = single_columns(metrics, widths[0], container_width_px);
                let pair = pair_columns(metrics, widths[1], widths[2], container_width_px);
                vec![solo, pair, pair]
            }
        }
        n => {
            let cols = match viewport {
                Viewport::Wide => Columns::One,
                Viewport::Compact => Columns::Two,
            };
            vec![cols; n]
        }
    };

    log::debug!(
        "layout: {} trays in {}px ({:?}) -> {:?}",
        groups.len(),
        container_width_px,
        viewport,
        columns
    );

    columns
        .into_iter()
        .zip(widths)
        .map(|(columns, piece_width_px)| TrayLayout {
            columns,
            piece_width_px,
        })
        .collect()
}

/// Widest single-row-first arrangement that fits: 4, then 2, then 1 column.
fn single_columns(metrics: &ViewportMetrics, piece_width: f32, container: f32) -> Columns {
    [Columns::Four, Columns::Two]
        .into_iter()
        .find(|&cols| metrics.row_width(cols, piece_width) <= container)
        .unwrap_or(Columns::One)
}

/// Two trays side by side: 2 columns each if both fit, otherwise vertical strips.
fn pair_columns(metrics: &ViewportMetrics, a: f32, b: f32, container: f32) -> Columns {
    let side_by_side =
        metrics.tray_width(Columns::Two, a) + metrics.tray_width(Columns::Two, b) + metrics.gap_px;
    if side_by_side <= container {
        Columns::Two
    } else {
        Columns::One
    }
}
