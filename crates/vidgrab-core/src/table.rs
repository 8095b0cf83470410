//! Plain-text table of available formats

use crate::info::FormatInfo;
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

fn row(out: &mut String, cols: [&str; 5]) {
    let _ = writeln!(
        out,
        "{:<10} {:<15} {:<10} {:<15} {:<10}",
        cols[0], cols[1], cols[2], cols[3], cols[4]
    );
}

pub fn render_format_table(formats: &[FormatInfo]) -> String {
    let mut out = String::new();
    row(&mut out, ["FORMAT", "EXTENSION", "RESOLUTION", "FILESIZE", "NOTE"]);
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    for f in formats {
        let size = f.display_size();
        row(
            &mut out,
            [
                f.display_id(),
                f.display_ext(),
                f.display_resolution(),
                &size,
                f.display_note(),
            ],
        );
    }
    out
}
