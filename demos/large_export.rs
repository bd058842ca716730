//! Streams a million generated rows through a custom row source.
//!
//! Memory stays flat no matter how many rows the source produces; the
//! worksheet and shared-strings streams are flushed every 1000 rows.

use std::time::Instant;

use sheetstream::{Exporter, RowSource};

struct GeneratedRows {
    next: u64,
    total: u64,
}

impl RowSource for GeneratedRows {
    fn next_row(&mut self) -> Option<Vec<String>> {
        if self.next == self.total {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(vec![
            i.to_string(),
            format!("Customer {}", i),
            format!("Order #{}", i * 37 % 99991),
            format!("region_{}", i % 8),
        ])
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let total = 1_000_000;
    let mut source = GeneratedRows { next: 0, total };

    let start = Instant::now();
    Exporter::new()
        .dedup_shared_strings(false)
        .export("demos/large.xlsx", &mut source)?;
    let elapsed = start.elapsed();

    println!(
        "Wrote {} rows in {:.2}s ({:.0} rows/sec)",
        total,
        elapsed.as_secs_f64(),
        total as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
