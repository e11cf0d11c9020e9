use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const TRACKS: usize = 50;

const ARTISTS: [&str; 12] = [
    "Nova Reyes",
    "The Lanterns",
    "Kito Vale",
    "Mara Quinn",
    "Dusk Theory",
    "Ollie Brandt",
    "Saffron Lee",
    "Hollow Pines",
    "JAYVE",
    "Luz Marín",
    "Northbound",
    "Tessa Cole",
];

const GENRES: [&str; 7] = [
    "dance pop",
    "pop",
    "melodic rap",
    "latin",
    "canadian pop",
    "modern rock",
    "electropop",
];

const WORDS: [&str; 16] = [
    "Midnight", "Neon", "Summer", "Echo", "Golden", "Paper", "Wild", "Silver", "Heart", "City",
    "Ocean", "Fire", "Dream", "Static", "Velvet", "Runaway",
];

/// Abbreviated source headers and the (mean, std, min, max) each column is drawn from.
const NUMERIC: [(&str, f64, f64, i64, i64); 10] = [
    ("bpm", 120.0, 25.0, 60, 200),
    ("nrgy", 65.0, 15.0, 10, 100),
    ("dnce", 70.0, 12.0, 20, 100),
    ("dB", -6.0, 2.0, -15, -1),
    ("live", 15.0, 10.0, 2, 90),
    ("val", 55.0, 20.0, 5, 99),
    ("dur", 200.0, 30.0, 110, 320),
    ("acous", 20.0, 20.0, 0, 95),
    ("spch", 10.0, 8.0, 2, 50),
    ("pop", 82.0, 4.0, 60, 100),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(2020);

    let mut titles = Vec::with_capacity(TRACKS);
    let mut artists = Vec::with_capacity(TRACKS);
    let mut genres = Vec::with_capacity(TRACKS);
    let mut numeric: Vec<Vec<i64>> = vec![Vec::with_capacity(TRACKS); NUMERIC.len()];

    for i in 0..TRACKS {
        titles.push(format!(
            "{} {} #{}",
            rng.pick(&WORDS),
            rng.pick(&WORDS),
            i + 1
        ));
        artists.push(rng.pick(&ARTISTS));
        genres.push(rng.pick(&GENRES));
        for (column, &(_, mean, std_dev, lo, hi)) in numeric.iter_mut().zip(&NUMERIC) {
            column.push((rng.gauss(mean, std_dev).round() as i64).clamp(lo, hi));
        }
    }

    let mut fields = vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("artist", DataType::Utf8, false),
        Field::new("top genre", DataType::Utf8, false),
    ];
    fields.extend(
        NUMERIC
            .iter()
            .map(|&(name, ..)| Field::new(name, DataType::Int64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(titles.clone())),
        Arc::new(StringArray::from(artists.clone())),
        Arc::new(StringArray::from(genres.clone())),
    ];
    columns.extend(
        numeric
            .iter()
            .map(|values| Arc::new(Int64Array::from(values.clone())) as ArrayRef),
    );

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Write Parquet
    let parquet_path = "sample_songs.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // Write the same rows as CSV
    let csv_path = "sample_songs.csv";
    let mut csv = csv::Writer::from_path(csv_path).context("creating CSV output")?;
    let header = ["title", "artist", "top genre"]
        .into_iter()
        .chain(NUMERIC.iter().map(|&(name, ..)| name));
    csv.write_record(header)?;
    for i in 0..TRACKS {
        let record = [titles[i].clone(), artists[i].to_string(), genres[i].to_string()]
            .into_iter()
            .chain(numeric.iter().map(|column| column[i].to_string()));
        csv.write_record(record)?;
    }
    csv.flush()?;

    println!("Wrote {TRACKS} tracks to {parquet_path} and {csv_path}");
    Ok(())
}
