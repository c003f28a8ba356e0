//! Tabular rendering of scan results.
//!
//! ```text
//! ALL    11  168 B
//! Node   10  160 B
//! *Node   1    8 B
//! ```

use std::fmt::Write;

use msz_scan::Sizes;
use msz_types::Pool;

struct Row {
    name: String,
    count: u64,
    total: u64,
    summary: bool,
}

/// Render `sizes` as a table, one row per type plus an `ALL` row.
///
/// Rows are ordered by total bytes, largest first; equal totals keep `ALL`
/// first and then sort by type name. The name column is left-aligned, the
/// count and size columns right-aligned.
pub fn report(sizes: &Sizes, pool: &Pool) -> String {
    let mut rows = vec![Row {
        name: "ALL".to_string(),
        count: sizes.count(),
        total: sizes.total,
        summary: true,
    }];
    rows.extend(sizes.by_type.iter().map(|(&ty, s)| Row {
        name: pool.name(ty),
        count: s.count,
        total: s.total,
        summary: false,
    }));
    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| b.summary.cmp(&a.summary))
            .then_with(|| a.name.cmp(&b.name))
    });

    let sizes: Vec<String> = rows.iter().map(|r| human_size(r.total)).collect();
    let name_w = rows.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let count_w = rows.iter().map(|r| digits(r.count)).max().unwrap_or(0);
    let size_w = sizes.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for (row, size) in rows.iter().zip(&sizes) {
        let _ = writeln!(
            out,
            "{:<name_w$}  {:>count_w$}  {:>size_w$}",
            row.name, row.count, size
        );
    }
    out
}

/// Render a byte count with a binary unit suffix.
///
/// Below 1 KiB the exact count is printed; above, three decimals of the
/// largest unit that keeps the value at least one.
#[allow(clippy::cast_precision_loss, reason = "display only")]
pub fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1 << 10;
    const MIB: u64 = 1 << 20;
    const GIB: u64 = 1 << 30;

    match bytes {
        b if b < KIB => format!("{b} B"),
        b if b < MIB => format!("{:.3} KiB", b as f64 / KIB as f64),
        b if b < GIB => format!("{:.3} MiB", b as f64 / MIB as f64),
        b => format!("{:.3} GiB", b as f64 / GIB as f64),
    }
}

fn digits(n: u64) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}
