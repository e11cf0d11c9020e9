use std::fmt;

use super::stats::Inspection;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell before conversion into a Track
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from CSV, JSON or Parquet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// CSV cells arrive as text; an empty cell is a null.
    pub fn from_text(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }

    /// Interpret the cell as a whole number.
    ///
    /// Floats are accepted only when they carry no fractional part, which is
    /// how Pandas writes integer columns that once held a NaN.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && v.fract() == 0.0)
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }

    /// Text view of the cell. Nulls become empty strings.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const TITLE: &str = "Title";
pub const ARTIST: &str = "Artist";
pub const TOP_GENRE: &str = "Top Genre";

/// The three text columns, in table order.
pub const TEXT_COLUMNS: [&str; 3] = [TITLE, ARTIST, TOP_GENRE];

/// The ten numeric attributes of a track, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    BeatsPerMinute,
    Energy,
    Danceability,
    Loudness,
    Liveness,
    Valence,
    Duration,
    Acousticness,
    Speechiness,
    Popularity,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 10] = [
        NumericColumn::BeatsPerMinute,
        NumericColumn::Energy,
        NumericColumn::Danceability,
        NumericColumn::Loudness,
        NumericColumn::Liveness,
        NumericColumn::Valence,
        NumericColumn::Duration,
        NumericColumn::Acousticness,
        NumericColumn::Speechiness,
        NumericColumn::Popularity,
    ];

    /// Canonical column name used throughout the dashboard.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::BeatsPerMinute => "Beats_Per_Minute",
            NumericColumn::Energy => "Energy",
            NumericColumn::Danceability => "Danceability",
            NumericColumn::Loudness => "Loudness",
            NumericColumn::Liveness => "Liveness",
            NumericColumn::Valence => "Valence",
            NumericColumn::Duration => "Duration",
            NumericColumn::Acousticness => "Acousticness",
            NumericColumn::Speechiness => "Speechiness",
            NumericColumn::Popularity => "Popularity",
        }
    }

    /// Abbreviated header as it appears in the source file (title-cased).
    pub fn abbreviation(self) -> &'static str {
        match self {
            NumericColumn::BeatsPerMinute => "Bpm",
            NumericColumn::Energy => "Nrgy",
            NumericColumn::Danceability => "Dnce",
            NumericColumn::Loudness => "Db",
            NumericColumn::Liveness => "Live",
            NumericColumn::Valence => "Val",
            NumericColumn::Duration => "Dur",
            NumericColumn::Acousticness => "Acous",
            NumericColumn::Speechiness => "Spch",
            NumericColumn::Popularity => "Pop",
        }
    }

    pub fn from_abbreviation(abbreviation: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|col| col.abbreviation() == abbreviation)
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All thirteen canonical column names in table order.
pub fn canonical_columns() -> Vec<&'static str> {
    TEXT_COLUMNS
        .into_iter()
        .chain(NumericColumn::ALL.into_iter().map(NumericColumn::name))
        .collect()
}

/// The source-file headers (title-cased, abbreviated) in table order.
pub fn source_columns() -> Vec<&'static str> {
    TEXT_COLUMNS
        .into_iter()
        .chain(NumericColumn::ALL.into_iter().map(NumericColumn::abbreviation))
        .collect()
}

// ---------------------------------------------------------------------------
// Track – one row of the table
// ---------------------------------------------------------------------------

/// One song's attribute row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub top_genre: String,
    pub beats_per_minute: i64,
    pub energy: i64,
    pub danceability: i64,
    /// Decibels, usually negative.
    pub loudness: i64,
    pub liveness: i64,
    pub valence: i64,
    /// Seconds.
    pub duration: i64,
    pub acousticness: i64,
    pub speechiness: i64,
    pub popularity: i64,
}

impl Track {
    pub fn value(&self, column: NumericColumn) -> i64 {
        match column {
            NumericColumn::BeatsPerMinute => self.beats_per_minute,
            NumericColumn::Energy => self.energy,
            NumericColumn::Danceability => self.danceability,
            NumericColumn::Loudness => self.loudness,
            NumericColumn::Liveness => self.liveness,
            NumericColumn::Valence => self.valence,
            NumericColumn::Duration => self.duration,
            NumericColumn::Acousticness => self.acousticness,
            NumericColumn::Speechiness => self.speechiness,
            NumericColumn::Popularity => self.popularity,
        }
    }

    /// All thirteen fields rendered as text, in table order.
    pub fn cells(&self) -> Vec<String> {
        [self.title.clone(), self.artist.clone(), self.top_genre.clone()]
            .into_iter()
            .chain(
                NumericColumn::ALL
                    .into_iter()
                    .map(|col| self.value(col).to_string()),
            )
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TrackTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Read-only once built.
#[derive(Debug, Clone)]
pub struct TrackTable {
    /// All tracks in file order.
    pub tracks: Vec<Track>,
    /// Null / duplicate findings gathered while loading.
    pub inspection: Inspection,
}

impl TrackTable {
    pub fn new(tracks: Vec<Track>, inspection: Inspection) -> Self {
        Self { tracks, inspection }
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The first `n` tracks in file order (fewer if the table is shorter).
    pub fn top_n(&self, n: usize) -> &[Track] {
        &self.tracks[..n.min(self.tracks.len())]
    }

    /// One numeric column as floats, in file order.
    pub fn column(&self, column: NumericColumn) -> Vec<f64> {
        self.tracks
            .iter()
            .map(|t| t.value(column) as f64)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::track;

    #[test]
    fn test_top_n_is_file_order_prefix() {
        let tracks: Vec<Track> = (0..20)
            .map(|i| track(&format!("song {i}"), "a", "pop", i))
            .collect();
        let table = TrackTable::new(tracks.clone(), Inspection::default());

        let top = table.top_n(15);
        assert_eq!(top.len(), 15);
        assert_eq!(top, &tracks[..15]);
        // Asking twice gives the same slice.
        assert_eq!(table.top_n(15), top);
    }

    #[test]
    fn test_top_n_shorter_table() {
        let table = TrackTable::new(vec![track("x", "a", "pop", 0)], Inspection::default());
        assert_eq!(table.top_n(15).len(), 1);
    }

    #[test]
    fn test_cell_as_i64() {
        assert_eq!(CellValue::Text(" 171 ".into()).as_i64(), Some(171));
        assert_eq!(CellValue::Text("-6".into()).as_i64(), Some(-6));
        assert_eq!(CellValue::Text("82.0".into()).as_i64(), Some(82));
        assert_eq!(CellValue::Float(82.5).as_i64(), None);
        assert_eq!(CellValue::Text("loud".into()).as_i64(), None);
        assert_eq!(CellValue::Null.as_i64(), None);
    }

    #[test]
    fn test_canonical_and_source_columns() {
        let canonical = canonical_columns();
        assert_eq!(canonical.len(), 13);
        assert_eq!(canonical[3], "Beats_Per_Minute");
        assert_eq!(source_columns()[6], "Db");
    }

    #[test]
    fn test_track_cells_follow_column_order() {
        let t = track("Blinding Lights", "The Weeknd", "canadian contemporary r&b", 0);
        let cells = t.cells();
        assert_eq!(cells.len(), 13);
        assert_eq!(cells[0], "Blinding Lights");
        assert_eq!(cells[3], "100");
        assert_eq!(cells[12], "80");
    }
}
