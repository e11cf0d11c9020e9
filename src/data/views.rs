use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use super::model::{NumericColumn, Track, TrackTable};
use super::stats::{self, ColumnSummary, CorrelationMatrix};

// ---------------------------------------------------------------------------
// Grouping helpers
// ---------------------------------------------------------------------------

/// Group by `key`, summing `value`, keeping groups in first-appearance order.
fn group_in_order<K, V>(tracks: &[Track], key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&Track) -> &str,
    V: Fn(&Track) -> f64,
{
    let mut groups: Vec<(String, f64)> = Vec::new();
    for track in tracks {
        let k = key(track);
        match groups.iter_mut().find(|(label, _)| label == k) {
            Some((_, total)) => *total += value(track),
            None => groups.push((k.to_string(), value(track))),
        }
    }
    groups
}

/// Number of songs per artist, artists in first-appearance order.
pub fn songs_per_artist(tracks: &[Track]) -> Vec<(String, usize)> {
    group_in_order(tracks, |t| t.artist.as_str(), |_| 1.0)
        .into_iter()
        .map(|(artist, n)| (artist, n as usize))
        .collect()
}

/// Popularity summed per top genre, genres in first-appearance order.
pub fn popularity_by_genre(tracks: &[Track]) -> Vec<(String, f64)> {
    group_in_order(tracks, |t| t.top_genre.as_str(), |t| t.popularity as f64)
}

/// Distinct top genres in first-appearance order.
pub fn genres(tracks: &[Track]) -> Vec<String> {
    group_in_order(tracks, |t| t.top_genre.as_str(), |_| 0.0)
        .into_iter()
        .map(|(genre, _)| genre)
        .collect()
}

/// The text echoed back after picking a song from the dropdown.
pub fn selection_echo(title: &str) -> String {
    format!("You selected: {title}")
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    /// Radians; slices run clockwise from twelve o'clock.
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Turn labelled values into consecutive clockwise slices.
///
/// Non-positive values get a zero-width slice so labels stay aligned with
/// the input.
pub fn pie_slices(values: &[(String, f64)]) -> Vec<PieSlice> {
    let total: f64 = values.iter().map(|(_, v)| v.max(0.0)).sum();
    let mut angle = FRAC_PI_2;

    values
        .iter()
        .map(|(label, value)| {
            let fraction = if total > 0.0 {
                value.max(0.0) / total
            } else {
                0.0
            };
            let start_angle = angle;
            angle -= fraction * TAU;
            PieSlice {
                label: label.clone(),
                value: *value,
                fraction,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Stacked histogram: popularity bins × genre, summing BPM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GenreSeries {
    pub genre: String,
    /// One sum per entry of [`GenreHistogram::bins`].
    pub sums: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenreHistogram {
    pub bin_width: i64,
    /// Lower edge of each occupied bin, ascending.
    pub bins: Vec<i64>,
    pub series: Vec<GenreSeries>,
}

/// Bin tracks by popularity (`bin_width` wide, aligned to multiples of it)
/// and sum beats-per-minute per genre within each bin.
pub fn genre_histogram(tracks: &[Track], bin_width: i64) -> GenreHistogram {
    let bin_width = bin_width.max(1);
    let bin_of = |t: &Track| t.popularity.div_euclid(bin_width) * bin_width;

    let mut bins: Vec<i64> = tracks.iter().map(bin_of).collect();
    bins.sort_unstable();
    bins.dedup();

    let series = genres(tracks)
        .into_iter()
        .map(|genre| {
            let mut per_bin: BTreeMap<i64, f64> = BTreeMap::new();
            for t in tracks.iter().filter(|t| t.top_genre == genre) {
                *per_bin.entry(bin_of(t)).or_default() += t.beats_per_minute as f64;
            }
            let sums = bins
                .iter()
                .map(|b| per_bin.get(b).copied().unwrap_or(0.0))
                .collect();
            GenreSeries { genre, sums }
        })
        .collect();

    GenreHistogram {
        bin_width,
        bins,
        series,
    }
}

// ---------------------------------------------------------------------------
// 3D scatter cloud
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CloudPoint {
    pub title: String,
    /// Raw attribute values.
    pub raw: [f64; 3],
    /// Each axis rescaled to [-1, 1].
    pub position: [f64; 3],
    pub color_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterCloud {
    pub axes: [NumericColumn; 3],
    pub color_axis: NumericColumn,
    /// (min, max) of each raw axis.
    pub ranges: [(f64, f64); 3],
    pub color_range: (f64, f64),
    pub points: Vec<CloudPoint>,
}

fn range_of(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn rescale(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let span = hi - lo;
    if span.abs() < f64::EPSILON {
        0.0
    } else {
        (v - lo) / span * 2.0 - 1.0
    }
}

/// Place every track in a unit cube over three attributes.
pub fn scatter_cloud(
    tracks: &[Track],
    axes: [NumericColumn; 3],
    color_axis: NumericColumn,
) -> ScatterCloud {
    let ranges = axes.map(|axis| range_of(tracks.iter().map(|t| t.value(axis) as f64)));
    let color_range = range_of(tracks.iter().map(|t| t.value(color_axis) as f64));

    let points = tracks
        .iter()
        .map(|t| {
            let raw = axes.map(|axis| t.value(axis) as f64);
            let position = [
                rescale(raw[0], ranges[0]),
                rescale(raw[1], ranges[1]),
                rescale(raw[2], ranges[2]),
            ];
            CloudPoint {
                title: t.title.clone(),
                raw,
                position,
                color_value: t.value(color_axis) as f64,
            }
        })
        .collect();

    ScatterCloud {
        axes,
        color_axis,
        ranges,
        color_range,
        points,
    }
}

// ---------------------------------------------------------------------------
// Everything the dashboard derives from one table
// ---------------------------------------------------------------------------

/// Derived views, computed once per loaded table.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub summary: Vec<ColumnSummary>,
    pub artist_counts: Vec<(String, usize)>,
    pub cloud: ScatterCloud,
    pub correlation: CorrelationMatrix,
    pub genre_pie: Vec<PieSlice>,
    pub genre_histogram: GenreHistogram,
    /// Largest energy among the top-N tracks, for bubble sizing.
    pub top_max_energy: f64,
}

impl DashboardViews {
    pub fn build(table: &TrackTable, top_n: usize, bin_width: i64) -> Self {
        let top = table.top_n(top_n);
        Self {
            summary: stats::describe(table),
            artist_counts: songs_per_artist(&table.tracks),
            cloud: scatter_cloud(
                &table.tracks,
                [
                    NumericColumn::Energy,
                    NumericColumn::Loudness,
                    NumericColumn::Liveness,
                ],
                NumericColumn::Popularity,
            ),
            correlation: stats::correlation_matrix(table),
            genre_pie: pie_slices(&popularity_by_genre(top)),
            genre_histogram: genre_histogram(top, bin_width),
            top_max_energy: top
                .iter()
                .map(|t| t.energy as f64)
                .fold(0.0, f64::max),
        }
    }
}

/// Bubble radius with area proportional to `value`, the largest value getting
/// `max_radius`.
pub fn bubble_radius(value: f64, max_value: f64, max_radius: f32) -> f32 {
    if max_value <= 0.0 {
        return max_radius;
    }
    ((value.max(0.0) / max_value).sqrt() as f32 * max_radius).max(1.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::loader;
    use crate::data::test_support::{canonical_dataset, track};

    #[test]
    fn test_songs_per_artist_first_appearance_order() {
        let tracks = vec![
            track("a", "Dua Lipa", "pop", 0),
            track("b", "The Weeknd", "pop", 0),
            track("c", "Dua Lipa", "pop", 0),
        ];
        assert_eq!(
            songs_per_artist(&tracks),
            vec![("Dua Lipa".to_string(), 2), ("The Weeknd".to_string(), 1)]
        );
    }

    #[test]
    fn test_songs_per_artist_covers_every_track() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let counts = songs_per_artist(&table.tracks);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), table.len());
    }

    #[test]
    fn test_selection_echo_contains_exactly_the_title() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        for track in table.top_n(15) {
            let echo = selection_echo(&track.title);
            assert_eq!(echo.strip_prefix("You selected: "), Some(track.title.as_str()));
        }
    }

    #[test]
    fn test_popularity_by_genre_sums() {
        let tracks = vec![
            track("a", "x", "dance pop", 0),  // pop 80
            track("b", "x", "pop", 5),        // pop 85
            track("c", "x", "dance pop", 10), // pop 90
        ];
        assert_eq!(
            popularity_by_genre(&tracks),
            vec![("dance pop".to_string(), 170.0), ("pop".to_string(), 85.0)]
        );
    }

    #[test]
    fn test_pie_slices_cover_the_circle() {
        let slices = pie_slices(&[
            ("a".to_string(), 1.0),
            ("b".to_string(), 3.0),
            ("c".to_string(), 0.0),
        ]);
        assert_eq!(slices.len(), 3);
        assert!((slices.iter().map(|s| s.fraction).sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(slices[0].start_angle, FRAC_PI_2);
        assert!((slices[1].fraction - 0.75).abs() < 1e-12);
        assert!((slices[2].end_angle - (FRAC_PI_2 - TAU)).abs() < 1e-12);
        assert_eq!(slices[2].start_angle, slices[2].end_angle);
    }

    #[test]
    fn test_pie_slices_empty_total() {
        let slices = pie_slices(&[("a".to_string(), 0.0)]);
        assert_eq!(slices[0].fraction, 0.0);
    }

    #[test]
    fn test_genre_histogram_bins_and_sums() {
        // popularity 80, 81, 86, 84 / bpm 100, 101, 106, 104
        let tracks = vec![
            track("a", "x", "pop", 0),
            track("b", "x", "rap", 1),
            track("c", "x", "pop", 6),
            track("d", "x", "pop", 4),
        ];
        let hist = genre_histogram(&tracks, 5);

        assert_eq!(hist.bins, vec![80, 85]);
        assert_eq!(hist.series.len(), 2);
        assert_eq!(hist.series[0].genre, "pop");
        assert_eq!(hist.series[0].sums, vec![204.0, 106.0]);
        assert_eq!(hist.series[1].genre, "rap");
        assert_eq!(hist.series[1].sums, vec![101.0, 0.0]);
    }

    #[test]
    fn test_scatter_cloud_is_unit_cube() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let cloud = scatter_cloud(
            &table.tracks,
            [
                NumericColumn::Energy,
                NumericColumn::Loudness,
                NumericColumn::Liveness,
            ],
            NumericColumn::Popularity,
        );
        assert_eq!(cloud.points.len(), 50);
        for p in &cloud.points {
            assert!(p.position.iter().all(|c| (-1.0..=1.0).contains(c)));
        }
        for axis in 0..3 {
            let lo = cloud.points.iter().map(|p| p.position[axis]).fold(f64::INFINITY, f64::min);
            let hi = cloud
                .points
                .iter()
                .map(|p| p.position[axis])
                .fold(f64::NEG_INFINITY, f64::max);
            assert_eq!((lo, hi), (-1.0, 1.0));
        }
    }

    #[test]
    fn test_scatter_cloud_constant_axis_is_centred() {
        let tracks = vec![track("a", "x", "g", 0), track("b", "x", "g", 2)];
        let cloud = scatter_cloud(
            &tracks,
            [
                NumericColumn::Energy,
                NumericColumn::Loudness,
                NumericColumn::Liveness,
            ],
            NumericColumn::Popularity,
        );
        assert_eq!(cloud.points[0].position, [-1.0, 0.0, 0.0]);
        assert_eq!(cloud.points[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(cloud.color_range, (80.0, 82.0));
    }

    #[test]
    fn test_dashboard_views_use_top_slice() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let views = DashboardViews::build(&table, 15, 5);

        let pie_total: f64 = views.genre_pie.iter().map(|s| s.value).sum();
        let top_total: f64 = table.top_n(15).iter().map(|t| t.popularity as f64).sum();
        assert_eq!(pie_total, top_total);

        let hist_total: f64 = views
            .genre_histogram
            .series
            .iter()
            .flat_map(|s| s.sums.iter())
            .sum();
        let bpm_total: f64 = table
            .top_n(15)
            .iter()
            .map(|t| t.beats_per_minute as f64)
            .sum();
        assert_eq!(hist_total, bpm_total);
        assert_eq!(views.summary.len(), 10);
    }

    #[test]
    fn test_bubble_radius() {
        assert_eq!(bubble_radius(80.0, 80.0, 14.0), 14.0);
        assert_eq!(bubble_radius(20.0, 80.0, 14.0), 7.0);
        // Quarter the area, half the radius.
        let half = bubble_radius(40.0, 80.0, 14.0);
        assert!((half * half * 2.0 - 14.0 * 14.0).abs() < 1e-3);
        assert_eq!(bubble_radius(0.0, 80.0, 14.0), 1.0);
        assert_eq!(bubble_radius(5.0, 0.0, 14.0), 14.0);
    }
}
