use std::path::Path;

use anyhow::{anyhow, Context, Result};

use super::model::{source_columns, NumericColumn, Track, TrackTable};

pub const FILE_NAME: &str = "songs.csv";
pub const MIME: &str = "text/csv";

/// Serialise tracks the way the source file looks: a leading unnamed index
/// column followed by the title-cased source headers.
pub fn to_csv_bytes(tracks: &[Track]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("").chain(source_columns());
    writer.write_record(header).context("writing CSV header")?;

    for (idx, track) in tracks.iter().enumerate() {
        let record = [
            idx.to_string(),
            track.title.clone(),
            track.artist.clone(),
            track.top_genre.clone(),
        ]
        .into_iter()
        .chain(
            NumericColumn::ALL
                .into_iter()
                .map(|col| track.value(col).to_string()),
        );
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row {idx}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

// ---------------------------------------------------------------------------
// Cached export
// ---------------------------------------------------------------------------

/// CSV bytes for the current table, built on first request.
#[derive(Debug, Default)]
pub struct CsvExport {
    cached: Option<Vec<u8>>,
}

impl CsvExport {
    /// The export for `table`, serialising only when nothing is cached.
    pub fn bytes(&mut self, table: &TrackTable) -> Result<&[u8]> {
        let bytes = match self.cached.take() {
            Some(bytes) => {
                log::debug!("Reusing cached CSV export ({} bytes)", bytes.len());
                bytes
            }
            None => to_csv_bytes(&table.tracks)?,
        };
        Ok(self.cached.insert(bytes).as_slice())
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Forget the cached bytes; the next request re-serialises.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Write the export to `path`.
    pub fn save(&mut self, table: &TrackTable, path: &Path) -> Result<()> {
        let bytes = self.bytes(table)?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} tracks to {}", table.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::loader;
    use crate::data::model::canonical_columns;
    use crate::data::test_support::canonical_dataset;

    #[test]
    fn test_export_header_and_index() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let bytes = to_csv_bytes(&table.tracks).expect("export");
        let text = String::from_utf8(bytes).expect("utf-8");

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(",Title,Artist,Top Genre,Bpm,Nrgy,Dnce,Db,Live,Val,Dur,Acous,Spch,Pop")
        );
        assert!(lines.next().is_some_and(|l| l.starts_with("0,")));
        assert_eq!(text.lines().count(), table.len() + 1);
    }

    #[test]
    fn test_export_round_trip() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let bytes = to_csv_bytes(&table.tracks).expect("export");

        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp file");
        std::io::Write::write_all(&mut file, &bytes).expect("write export");

        let reloaded = loader::load_file(file.path()).expect("export re-parses");
        assert_eq!(reloaded.len(), table.len());
        assert_eq!(reloaded.tracks, table.tracks);

        // The unnamed index column comes along; every canonical column is present.
        let columns: Vec<&str> = reloaded
            .inspection
            .null_counts
            .iter()
            .map(|(c, _)| c.as_str())
            .collect();
        assert_eq!(columns[0], "");
        assert_eq!(&columns[1..], canonical_columns().as_slice());
    }

    #[test]
    fn test_export_is_cached_until_invalidated() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let mut export = CsvExport::default();
        assert!(!export.is_cached());

        let first = export.bytes(&table).expect("export").as_ptr();
        assert!(export.is_cached());
        let second = export.bytes(&table).expect("export").as_ptr();
        assert_eq!(first, second);

        export.invalidate();
        assert!(!export.is_cached());
    }

    #[test]
    fn test_save_writes_file() {
        let table = loader::load_file(&canonical_dataset()).expect("canonical dataset loads");
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(FILE_NAME);

        let mut export = CsvExport::default();
        export.save(&table, &path).expect("save export");
        let written = std::fs::read(&path).expect("read export");
        assert_eq!(written, to_csv_bytes(&table.tracks).expect("export"));
    }
}
