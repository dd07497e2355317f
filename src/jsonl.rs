//! JSON Lines codec for fragments in and references out.
//!
//! Works over caller-supplied readers and writers only.

use crate::fragment::{Fragment, FragmentRecord};
use crate::reference::StructuredReference;
use crate::Result;
use std::io::{BufRead, Write};

/// Read one fragment per line.
///
/// Blank lines are skipped. Lines that are not UTF-8, or that fail to parse
/// or validate, are logged and skipped. Only read failures are returned as
/// errors.
pub fn read_fragments<R: BufRead>(reader: R) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for (line_no, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Line {}: {}", line_no + 1, e);
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed = serde_json::from_str::<FragmentRecord>(trimmed)
            .map_err(crate::Error::from)
            .and_then(FragmentRecord::validate);
        match parsed {
            Ok(fragment) => fragments.push(fragment),
            Err(e) => log::warn!("Line {}: {}", line_no + 1, e),
        }
    }
    Ok(fragments)
}

/// Write one JSON object per reference.
pub fn write_references<W: Write>(
    mut writer: W,
    references: &[StructuredReference],
) -> Result<()> {
    for reference in references {
        serde_json::to_writer(&mut writer, reference)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
