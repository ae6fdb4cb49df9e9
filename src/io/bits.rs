//! Bit-level binding files (`input-bits.txt`, `constants-bits.txt`):
//! `LABEL,V` where `V` is one of `0`, `1`, `X` (`§6`).

use crate::error::{Error, Result};
use crate::eval::trivalue::Tri;
use crate::signal::Label;

/// Parses a bit-level binding file's contents into `(Label, Tri)` pairs,
/// in file order. Blank lines are skipped; everything else must match
/// `LABEL,V`.
pub fn parse_bit_bindings(file: &str, contents: &str) -> Result<Vec<(Label, Tri)>> {
    let mut out = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let (label_str, value_str) = line.split_once(',').ok_or_else(|| Error::MalformedLine {
            file: file.to_string(),
            line: line_no,
            text: line.to_string(),
        })?;
        let value = match value_str {
            "0" => Tri::Zero,
            "1" => Tri::One,
            "X" | "x" => Tri::X,
            _ => {
                return Err(Error::MalformedLine {
                    file: file.to_string(),
                    line: line_no,
                    text: line.to_string(),
                })
            }
        };
        out.push((Label::new(label_str), value));
    }
    Ok(out)
}

/// Serializes `(Label, Tri)` bindings back to the `LABEL,V` form, in the
/// order given.
pub fn write_bit_bindings(bindings: &[(Label, Tri)]) -> String {
    let mut out = String::new();
    for (label, value) in bindings {
        out.push_str(label.as_str());
        out.push(',');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}
