//! Word-level binding files (`input.txt`, `constants.txt`): `LABEL,VALUE`
//! where `VALUE` is eight hex characters, big-endian, grouped into four
//! byte-pairs. A byte-pair may be the literal `XX` instead of two hex
//! digits, marking that whole byte (8 bits) unknown — the file format's
//! only way to carry partial knowledge at word granularity (`§6`).

use crate::error::{Error, Result};
use crate::eval::trivalue::Tri;
use crate::signal::Label;

/// One word-level binding: a label plus one [`Tri`] per bit, indexed
/// `[bit 0 (LSB) ..= bit 31 (MSB)]` to match `crate::bits`'s convention.
pub type WordBinding = (Label, [Tri; 32]);

/// Parses a word-level binding file into `(Label, [Tri; 32])` pairs, in
/// file order.
pub fn parse_word_bindings(file: &str, contents: &str) -> Result<Vec<WordBinding>> {
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
        let bits = parse_word_value(value_str).ok_or_else(|| Error::MalformedLine {
            file: file.to_string(),
            line: line_no,
            text: line.to_string(),
        })?;
        out.push((Label::new(label_str), bits));
    }
    Ok(out)
}

fn parse_word_value(value_str: &str) -> Option<[Tri; 32]> {
    if value_str.len() != 8 {
        return None;
    }
    let mut bits = [Tri::X; 32];
    for (byte_idx, chunk) in value_str.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk).ok()?;
        // Byte index 0 holds the most significant byte of the word (the
        // value is written big-endian), so it fills the top bits.
        let bit_hi = 31 - byte_idx as u32 * 8;
        if pair.eq_ignore_ascii_case("xx") {
            for b in 0..8u32 {
                bits[(bit_hi - b) as usize] = Tri::X;
            }
            continue;
        }
        let byte = u8::from_str_radix(pair, 16).ok()?;
        for b in 0..8u32 {
            let bit_value = (byte >> b) & 1 == 1;
            bits[(bit_hi - 7 + b) as usize] = Tri::from_bool(bit_value);
        }
    }
    Some(bits)
}

/// Serializes word-level bindings back to `LABEL,VALUE` form. A fully
/// known byte renders as two hex digits; a byte with any unknown bit
/// renders as `XX`.
pub fn write_word_bindings(bindings: &[WordBinding]) -> String {
    let mut out = String::new();
    for (label, bits) in bindings {
        out.push_str(label.as_str());
        out.push(',');
        for byte_idx in 0..4u32 {
            let bit_hi = 31 - byte_idx * 8;
            let byte_bits = &bits[(bit_hi - 7) as usize..=(bit_hi as usize)];
            if byte_bits.iter().any(|b| *b == Tri::X) {
                out.push_str("XX");
                continue;
            }
            let mut byte = 0u8;
            for (b, bit) in byte_bits.iter().enumerate() {
                byte |= (bit.as_bool().unwrap() as u8) << b;
            }
            out.push_str(&format!("{byte:02X}"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_fully_known_word() {
        let parsed = parse_word_bindings("f", "INPUT-W0,00000001\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].1[0], Tri::One);
        assert_eq!(parsed[0].1[31], Tri::Zero);
    }

    #[test]
    fn xx_byte_marks_eight_bits_unknown() {
        let parsed = parse_word_bindings("f", "INPUT-W0,XX000000\n").unwrap();
        for bit in 24..32 {
            assert_eq!(parsed[0].1[bit], Tri::X);
        }
        for bit in 0..24 {
            assert_eq!(parsed[0].1[bit], Tri::Zero);
        }
    }

    #[test]
    fn rejects_a_value_of_the_wrong_length() {
        let err = parse_word_bindings("f", "INPUT-W0,0001\n").unwrap_err();
        assert!(matches!(err, Error::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn write_then_parse_round_trips() {
        let mut bits = [Tri::Zero; 32];
        bits[0] = Tri::One;
        for b in 24..32 {
            bits[b] = Tri::X;
        }
        let bindings = vec![(Label::input(2, 0), bits)];
        let text = write_word_bindings(&bindings);
        let parsed = parse_word_bindings("f", &text).unwrap();
        assert_eq!(parsed, bindings);
    }
}
