//! Chart geometry for the dashboard.
//!
//! Everything here is a pure function from ledger aggregates to SVG
//! coordinates; the templates only place the precomputed shapes.

use ledger::models::{format_cents, Category, MonthlyTotal, Outlier};
use ledger::stats::FiveNumberSummary;
use std::collections::BTreeMap;
use std::f64::consts::PI;

pub const PALETTE: [&str; 5] = ["#FFB3BA", "#BAE1FF", "#BAFFC9", "#FFDFBA", "#D5AAFF"];

const PIE_CENTER: f64 = 100.0;
const PIE_RADIUS: f64 = 90.0;
const PIE_START_DEG: f64 = 90.0;

pub const LINE_WIDTH: f64 = 600.0;
pub const LINE_HEIGHT: f64 = 300.0;
const LINE_LEFT: f64 = 70.0;
const LINE_RIGHT: f64 = 20.0;
const LINE_TOP: f64 = 20.0;
const LINE_BOTTOM: f64 = 50.0;

pub const BOX_WIDTH: f64 = 600.0;
const BOX_MARGIN: f64 = 30.0;

#[derive(Debug, Clone)]
pub struct PieSlice {
    pub label: String,
    pub percent: String,
    pub path: String,
    pub color: &'static str,
    pub label_x: String,
    pub label_y: String,
}

#[derive(Debug, Clone)]
pub struct LinePoint {
    pub x: String,
    pub y: String,
    pub month: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub polyline: String,
    pub points: Vec<LinePoint>,
    pub axis_y0: String,
    pub axis_x0: String,
    pub axis_x1: String,
    pub y_max_label: String,
}

#[derive(Debug, Clone)]
pub struct BoxPlot {
    pub whisker_lo: String,
    pub whisker_hi: String,
    pub q1: String,
    pub q3: String,
    pub median: String,
    pub box_width: String,
    pub outliers: Vec<String>,
    pub min_label: String,
    pub max_label: String,
}

fn coord(v: f64) -> String {
    format!("{:.2}", v)
}

fn polar(angle_deg: f64, radius: f64) -> (f64, f64) {
    let rad = angle_deg * PI / 180.0;
    (PIE_CENTER + radius * rad.cos(), PIE_CENTER - radius * rad.sin())
}

/// Slices start at 12 o'clock and run counter-clockwise in category order.
/// Only positive totals can be drawn; anything else is left out.
pub fn pie_chart(by_category: &BTreeMap<Category, i64>) -> Vec<PieSlice> {
    let positive: Vec<(Category, i64)> = by_category
        .iter()
        .filter(|(_, total)| **total > 0)
        .map(|(c, t)| (*c, *t))
        .collect();
    let sum = positive.iter().fold(0i64, |acc, (_, t)| acc.saturating_add(*t));
    if sum == 0 {
        return Vec::new();
    }

    let mut start = PIE_START_DEG;
    positive
        .into_iter()
        .map(|(category, total)| {
            let share = total as f64 / sum as f64;
            let sweep = share * 360.0;
            let end = start + sweep;

            let path = if share >= 1.0 {
                let (l, r) = (PIE_CENTER - PIE_RADIUS, PIE_CENTER + PIE_RADIUS);
                format!(
                    "M {l:.2} {c:.2} A {rad:.2} {rad:.2} 0 1 0 {r:.2} {c:.2} A {rad:.2} {rad:.2} 0 1 0 {l:.2} {c:.2} Z",
                    c = PIE_CENTER,
                    rad = PIE_RADIUS
                )
            } else {
                let (x0, y0) = polar(start, PIE_RADIUS);
                let (x1, y1) = polar(end, PIE_RADIUS);
                let large = if sweep > 180.0 { 1 } else { 0 };
                format!(
                    "M {c:.2} {c:.2} L {x0:.2} {y0:.2} A {rad:.2} {rad:.2} 0 {large} 0 {x1:.2} {y1:.2} Z",
                    c = PIE_CENTER,
                    rad = PIE_RADIUS
                )
            };

            let (lx, ly) = polar(start + sweep / 2.0, PIE_RADIUS * 0.6);
            start = end;

            PieSlice {
                label: category.to_string(),
                percent: format!("{:.1}%", share * 100.0),
                path,
                color: PALETTE[Category::ALL.iter().position(|c| *c == category).unwrap_or(0) % PALETTE.len()],
                label_x: coord(lx),
                label_y: coord(ly),
            }
        })
        .collect()
}

/// Months spread evenly along x, totals scaled from 0 to the largest month.
pub fn line_chart(trend: &[MonthlyTotal]) -> Option<LineChart> {
    if trend.is_empty() {
        return None;
    }

    let plot_w = LINE_WIDTH - LINE_LEFT - LINE_RIGHT;
    let plot_h = LINE_HEIGHT - LINE_TOP - LINE_BOTTOM;
    let y_max = trend.iter().map(|m| m.total).max().unwrap_or(0).max(1);
    let y_min = trend.iter().map(|m| m.total).min().unwrap_or(0).min(0);
    let span = y_max as f64 - y_min as f64;
    let baseline = LINE_TOP + plot_h;

    let x_at = |i: usize| {
        if trend.len() == 1 {
            LINE_LEFT + plot_w / 2.0
        } else {
            LINE_LEFT + plot_w * i as f64 / (trend.len() - 1) as f64
        }
    };
    let y_at = |v: i64| baseline - plot_h * (v as f64 - y_min as f64) / span;

    let points: Vec<LinePoint> = trend
        .iter()
        .enumerate()
        .map(|(i, m)| LinePoint {
            x: coord(x_at(i)),
            y: coord(y_at(m.total)),
            month: m.month.clone(),
            value: format_cents(m.total),
        })
        .collect();

    let polyline = points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");

    Some(LineChart {
        polyline,
        points,
        axis_y0: coord(y_at(0)),
        axis_x0: coord(LINE_LEFT),
        axis_x1: coord(LINE_LEFT + plot_w),
        y_max_label: format_cents(y_max),
    })
}

/// Horizontal box plot over the amounts (in cents). Dots are drawn for the
/// given outliers, as detected on the same ledger.
pub fn box_plot(amounts: &[f64], outliers: &[Outlier]) -> Option<BoxPlot> {
    let summary = FiveNumberSummary::from_values(amounts)?;

    let (lo, hi) = if summary.max > summary.min {
        (summary.min, summary.max)
    } else {
        (summary.min - 1.0, summary.max + 1.0)
    };
    let width = BOX_WIDTH - 2.0 * BOX_MARGIN;
    let x_at = |v: f64| BOX_MARGIN + width * (v - lo) / (hi - lo);

    let outliers = outliers
        .iter()
        .map(|o| coord(x_at(o.record.amount as f64)))
        .collect();

    Some(BoxPlot {
        whisker_lo: coord(x_at(summary.lower_whisker)),
        whisker_hi: coord(x_at(summary.upper_whisker)),
        q1: coord(x_at(summary.q1)),
        q3: coord(x_at(summary.q3)),
        median: coord(x_at(summary.median)),
        box_width: coord(x_at(summary.q3) - x_at(summary.q1)),
        outliers,
        min_label: format_cents(summary.min.round() as i64),
        max_label: format_cents(summary.max.round() as i64),
    })
}
