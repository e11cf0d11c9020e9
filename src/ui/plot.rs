use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Align2, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::color::{
    self, CategoryColors, ColorScale, CORAL, LIGHT_SALMON, MEDIUM_BLUE, SET1_RED, TOMATO,
};
use crate::data::model::Track;
use crate::data::stats::CorrelationMatrix;
use crate::data::views::{self, GenreHistogram, PieSlice, ScatterCloud};
use crate::ui::orbit::{cube_edges, Orbit};

const PLOT_HEIGHT: f32 = 380.0;
const PIE_HOLE: f64 = 0.3;
const BUBBLE_MAX_RADIUS: f32 = 14.0;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Axis formatter that prints a category label at each integer position.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

/// Horizontal gradient strip labelled with the scale's value range.
fn color_bar(ui: &mut Ui, title: &str, scale: &ColorScale, min: f64, max: f64) {
    const STEPS: usize = 48;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(title);
        ui.label(format!("{min:.0}"));
        let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 12.0), Sense::hover());
        let step_width = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let x0 = rect.left() + i as f32 * step_width;
            let segment = egui::Rect::from_min_max(
                egui::pos2(x0, rect.top()),
                egui::pos2(x0 + step_width + 0.5, rect.bottom()),
            );
            let t = i as f64 / (STEPS - 1) as f64;
            ui.painter().rect_filled(segment, 0.0, scale.at(t));
        }
        ui.label(format!("{max:.0}"));
    });
}

fn titles(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.title.clone()).collect()
}

// ---------------------------------------------------------------------------
// Full-table panels
// ---------------------------------------------------------------------------

/// Danceability of every song as a vertical bar.
pub fn danceability_bars(ui: &mut Ui, tracks: &[Track]) {
    chart_title(ui, "Danceability/Song");

    let bars: Vec<Bar> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.danceability as f64)
                .name(&t.title)
                .fill(color::with_opacity(CORAL, 0.6))
                .stroke(Stroke::new(1.5, TOMATO))
        })
        .collect();

    Plot::new("danceability_per_song")
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .x_axis_formatter(category_formatter(titles(tracks)))
        .y_axis_label("Danceability")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Danceability"));
        });
}

/// Popularity per song as horizontal bars, coloured by danceability.
pub fn popularity_bars(ui: &mut Ui, tracks: &[Track]) {
    chart_title(ui, "Popularity vs. Danceability");

    let scale = ColorScale::plasma();
    let (lo, hi) = tracks.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
        let d = t.danceability as f64;
        (lo.min(d), hi.max(d))
    });

    let bars: Vec<Bar> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| {
            Bar::new(i as f64, t.popularity as f64)
                .name(format!("{} (danceability {})", t.title, t.danceability))
                .fill(scale.map(t.danceability as f64, lo, hi))
        })
        .collect();

    Plot::new("popularity_vs_danceability")
        .height(PLOT_HEIGHT * 1.6)
        .allow_scroll(false)
        .x_axis_label("Popularity")
        .y_axis_formatter(category_formatter(titles(tracks)))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Popularity"));
        });

    if lo.is_finite() {
        color_bar(ui, "Danceability", &scale, lo, hi);
    }
}

/// Number of songs per artist.
pub fn artist_histogram(ui: &mut Ui, counts: &[(String, usize)]) {
    chart_title(ui, "Number of Songs per Artist");

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (artist, n))| Bar::new(i as f64, *n as f64).name(artist))
        .collect();
    let labels = counts.iter().map(|(artist, _)| artist.clone()).collect();

    Plot::new("songs_per_artist")
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .x_axis_formatter(category_formatter(labels))
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(SET1_RED).name("Artist"));
        });
}

/// Rotatable scatter of every track inside a unit cube. Drag to orbit.
pub fn scatter_3d(ui: &mut Ui, cloud: &ScatterCloud, orbit: &mut Orbit) {
    let [ax, ay, az] = cloud.axes;
    chart_title(ui, &format!("{ax}, {ay}, {az} plot of Songs"));

    let scale = ColorScale::sunset();
    let (c_lo, c_hi) = cloud.color_range;
    let view = *orbit;

    // Far points first so near ones are painted on top.
    let mut order: Vec<usize> = (0..cloud.points.len()).collect();
    order.sort_by(|&a, &b| {
        view.depth(cloud.points[a].position)
            .total_cmp(&view.depth(cloud.points[b].position))
    });

    let response = Plot::new("scatter_3d")
        .height(PLOT_HEIGHT * 1.4)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.9)
        .include_x(1.9)
        .include_y(-1.9)
        .include_y(1.9)
        .label_formatter(|name, _| name.to_owned())
        .show(ui, |plot_ui| {
            for (a, b) in cube_edges() {
                let line = Line::new(PlotPoints::from(vec![view.project(a), view.project(b)]))
                    .color(Color32::from_gray(110))
                    .width(1.0);
                plot_ui.line(line);
            }

            let axis_tips = [[1.3, -1.0, -1.0], [-1.0, 1.3, -1.0], [-1.0, -1.0, 1.3]];
            for (axis, tip) in axis_tips.into_iter().enumerate() {
                let [x, y] = view.project(tip);
                let (lo, hi) = cloud.ranges[axis];
                let text = format!("{} ({lo}..{hi})", cloud.axes[axis]);
                plot_ui.text(
                    Text::new(PlotPoint::new(x, y), RichText::new(text).strong())
                        .anchor(Align2::CENTER_CENTER),
                );
            }

            for &idx in &order {
                let p = &cloud.points[idx];
                let [x, y] = view.project(p.position);
                let label = format!(
                    "{}\n{ax}: {}\n{ay}: {}\n{az}: {}\n{}: {}",
                    p.title, p.raw[0], p.raw[1], p.raw[2], cloud.color_axis, p.color_value
                );
                plot_ui.points(
                    Points::new(vec![[x, y]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0)
                        .color(scale.map(p.color_value, c_lo, c_hi))
                        .name(label),
                );
            }
        })
        .response;

    if response.dragged() {
        let delta = response.drag_delta();
        orbit.drag(delta.x, delta.y);
    }
    response.on_hover_text("Drag to rotate");

    color_bar(ui, cloud.color_axis.name(), &scale, c_lo, c_hi);
}

/// Pearson correlation heatmap on the sunset scale, z clamped to [-1, 1].
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    chart_title(ui, "Features Correlation Matrix");

    let scale = ColorScale::sunset();
    let names: Vec<String> = matrix.columns.iter().map(|c| c.name().to_string()).collect();
    let n = matrix.len();
    let hover_matrix = matrix.clone();

    Plot::new("correlation_heatmap")
        .height(PLOT_HEIGHT * 1.4)
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(category_formatter(names.clone()))
        .y_axis_formatter(category_formatter(names))
        .label_formatter(move |_, value| {
            let (row, col) = (value.y.round(), value.x.round());
            if row < 0.0 || col < 0.0 || row as usize >= n || col as usize >= n {
                return String::new();
            }
            let (row, col) = (row as usize, col as usize);
            format!(
                "{} × {}: {:.3}",
                hover_matrix.columns[row],
                hover_matrix.columns[col],
                hover_matrix.get(row, col)
            )
        })
        .show(ui, |plot_ui| {
            for row in 0..n {
                for col in 0..n {
                    let r = matrix.get(row, col);
                    let (x, y) = (col as f64, row as f64);
                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(cell))
                            .fill_color(scale.map(r.clamp(-1.0, 1.0), -1.0, 1.0))
                            .stroke(Stroke::NONE),
                    );
                    let text = if r.is_nan() {
                        "–".to_string()
                    } else {
                        format!("{r:.2}")
                    };
                    plot_ui.text(
                        Text::new(PlotPoint::new(x, y), RichText::new(text).small())
                            .color(Color32::BLACK),
                    );
                }
            }
        });

    color_bar(ui, "r", &scale, -1.0, 1.0);
}

// ---------------------------------------------------------------------------
// Top-N panels
// ---------------------------------------------------------------------------

/// Beats per minute, energy and danceability side by side per song.
pub fn grouped_bars(ui: &mut Ui, tracks: &[Track]) {
    chart_title(ui, "Top Songs 2020");

    let series: [(&str, Color32, fn(&Track) -> i64); 3] = [
        ("Beats Per Minute", CORAL, |t| t.beats_per_minute),
        ("Energy Per Song", LIGHT_SALMON, |t| t.energy),
        ("Danceability Per Song", MEDIUM_BLUE, |t| t.danceability),
    ];
    let width = 0.8 / series.len() as f64;

    let charts: Vec<BarChart> = series
        .iter()
        .enumerate()
        .map(|(k, (name, color, value))| {
            let offset = (k as f64 - 1.0) * width;
            let bars = tracks
                .iter()
                .enumerate()
                .map(|(i, t)| {
                    Bar::new(i as f64 + offset, value(t) as f64)
                        .name(&t.title)
                        .width(width * 0.95)
                })
                .collect();
            BarChart::new(bars).name(*name).color(*color)
        })
        .collect();

    Plot::new("top_songs_grouped")
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Song")
        .y_axis_label("scale")
        .x_axis_formatter(category_formatter(titles(tracks)))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Popularity per song; colour by top genre, bubble size by energy.
pub fn genre_bubbles(ui: &mut Ui, tracks: &[Track], colors: &CategoryColors, max_energy: f64) {
    chart_title(ui, "Popularity vs. Genre vs. Energy");

    Plot::new("genre_bubbles")
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Title")
        .y_axis_label("Popularity")
        .x_axis_formatter(category_formatter(titles(tracks)))
        .show(ui, |plot_ui| {
            for (i, t) in tracks.iter().enumerate() {
                plot_ui.points(
                    Points::new(vec![[i as f64, t.popularity as f64]])
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(views::bubble_radius(
                            t.energy as f64,
                            max_energy,
                            BUBBLE_MAX_RADIUS,
                        ))
                        .color(colors.color_for(&t.top_genre))
                        .name(&t.top_genre),
                );
            }
        });
}

/// Donut chart of popularity per top genre.
pub fn genre_pie(ui: &mut Ui, slices: &[PieSlice], colors: &CategoryColors) {
    chart_title(ui, "Pie Chart of Top Genres");

    Plot::new("genre_pie")
        .height(PLOT_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .include_x(-1.2)
        .include_x(1.2)
        .include_y(-1.2)
        .include_y(1.2)
        .show(ui, |plot_ui| {
            for slice in slices.iter().filter(|s| s.fraction > 0.0) {
                let color = colors.color_for(&slice.label);
                for quad in annular_sector(slice.start_angle, slice.end_angle, PIE_HOLE, 1.0) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(quad))
                            .fill_color(color)
                            .stroke(Stroke::NONE)
                            .name(format!("{}: {:.0}", slice.label, slice.value)),
                    );
                }

                let mid = (slice.start_angle + slice.end_angle) / 2.0;
                let r = (1.0 + PIE_HOLE) / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(r * mid.cos(), r * mid.sin()),
                        RichText::new(format!("{:.1}%", slice.fraction * 100.0)).small(),
                    )
                    .color(Color32::BLACK),
                );
            }
            plot_ui.text(Text::new(
                PlotPoint::new(0.0, 0.0),
                RichText::new("Top Genre").size(20.0),
            ));
        });
}

/// Split a ring sector into convex quads (egui only fills convex shapes).
fn annular_sector(start: f64, end: f64, inner: f64, outer: f64) -> Vec<Vec<[f64; 2]>> {
    let steps = (((start - end).abs() / TAU) * 96.0).ceil().max(1.0) as usize;
    let at = |r: f64, a: f64| [r * a.cos(), r * a.sin()];
    (0..steps)
        .map(|k| {
            let a0 = start + (end - start) * k as f64 / steps as f64;
            let a1 = start + (end - start) * (k + 1) as f64 / steps as f64;
            vec![at(inner, a0), at(outer, a0), at(outer, a1), at(inner, a1)]
        })
        .collect()
}

/// Popularity bins stacked by genre, bar height = summed beats per minute.
pub fn genre_histogram(ui: &mut Ui, hist: &GenreHistogram, colors: &CategoryColors) {
    chart_title(ui, "Top Genres vs. Beats Per Minute and Popularity");

    let half = hist.bin_width as f64 / 2.0;
    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
    for series in &hist.series {
        let bars = hist
            .bins
            .iter()
            .zip(&series.sums)
            .map(|(&bin, &sum)| {
                Bar::new(bin as f64 + half, sum)
                    .name(format!("{}–{}", bin, bin + hist.bin_width - 1))
                    .width(hist.bin_width as f64 * 0.95)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.genre)
            .color(color::with_opacity(colors.color_for(&series.genre), 0.8))
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("genre_histogram")
        .height(PLOT_HEIGHT)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Popularity")
        .y_axis_label("sum of Beats_Per_Minute")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_formatter_only_labels_integers() {
        let fmt = category_formatter(vec!["a".into(), "b".into()]);
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "b");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(-1.0), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(7.0), &(0.0..=1.0)), "");
    }

    #[test]
    fn test_annular_sector_spans_the_slice() {
        let quads = annular_sector(1.0, -1.0, 0.3, 1.0);
        assert!(!quads.is_empty());
        let first = &quads[0];
        let last = &quads[quads.len() - 1];
        assert!((first[0][0] - 0.3 * 1.0f64.cos()).abs() < 1e-12);
        assert!((last[2][1] - (-1.0f64).sin()).abs() < 1e-12);
        assert!(quads.iter().all(|q| q.len() == 4));
    }
}
