//! `functions.txt`: the word-level operation listing, `LABEL,OP,OPERAND1
//! [,OPERAND2[,OPERAND3]]` (`§6`). One line per [`WordOp`] in the order
//! the word model generated them.

use crate::error::{Error, Result};
use crate::signal::Label;
use crate::word::WordOp;

/// Parses `functions.txt` into `(Label, WordOp)` pairs, in file order.
pub fn parse_functions(file: &str, contents: &str) -> Result<Vec<(Label, WordOp)>> {
    let mut out = Vec::new();
    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split(',').collect();
        let malformed = || Error::MalformedLine {
            file: file.to_string(),
            line: line_no,
            text: line.to_string(),
        };
        if fields.len() < 2 {
            return Err(malformed());
        }
        let label = Label::new(fields[0]);
        let op_field = fields[1];
        let operands = &fields[2..];

        let op = parse_op(op_field, operands).ok_or_else(|| {
            if shift_opcode_count(op_field).is_some() {
                Error::ShiftOutOfRange {
                    file: file.to_string(),
                    line: line_no,
                    count: shift_opcode_count(op_field).unwrap(),
                }
            } else {
                Error::UnknownOpcode {
                    file: file.to_string(),
                    line: line_no,
                    opcode: op_field.to_string(),
                }
            }
        })?;
        out.push((label, op));
    }
    Ok(out)
}

fn shift_opcode_count(op_field: &str) -> Option<i64> {
    let rest = op_field.strip_prefix("ROTR").or_else(|| op_field.strip_prefix("SHR"))?;
    rest.parse::<i64>().ok()
}

fn parse_op(op_field: &str, operands: &[&str]) -> Option<WordOp> {
    match op_field {
        "COPY" if operands.len() == 1 => Some(WordOp::Copy(Label::new(operands[0]))),
        "NOT" if operands.len() == 1 => Some(WordOp::Not(Label::new(operands[0]))),
        "AND" if operands.len() == 2 => {
            Some(WordOp::And(Label::new(operands[0]), Label::new(operands[1])))
        }
        "OR" if operands.len() == 2 => {
            Some(WordOp::Or(Label::new(operands[0]), Label::new(operands[1])))
        }
        "XOR" if operands.len() == 2 => {
            Some(WordOp::Xor(Label::new(operands[0]), Label::new(operands[1])))
        }
        "ADD" if operands.len() == 2 => {
            Some(WordOp::Add(Label::new(operands[0]), Label::new(operands[1])))
        }
        "CH" if operands.len() == 3 => Some(WordOp::Ch(
            Label::new(operands[0]),
            Label::new(operands[1]),
            Label::new(operands[2]),
        )),
        "MAJ" if operands.len() == 3 => Some(WordOp::Maj(
            Label::new(operands[0]),
            Label::new(operands[1]),
            Label::new(operands[2]),
        )),
        _ if operands.len() == 1 => {
            let n = shift_opcode_count(op_field)?;
            if !(1..=31).contains(&n) {
                return None;
            }
            if op_field.starts_with("ROTR") {
                Some(WordOp::Rotr(Label::new(operands[0]), n as u32))
            } else if op_field.starts_with("SHR") {
                Some(WordOp::Shr(Label::new(operands[0]), n as u32))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Serializes `(Label, WordOp)` pairs back to `functions.txt` form, in
/// the order given.
pub fn write_functions(ops: &[(Label, WordOp)]) -> String {
    let mut out = String::new();
    for (label, op) in ops {
        out.push_str(label.as_str());
        out.push(',');
        out.push_str(&op.opcode_str());
        for operand in op.operands() {
            out.push(',');
            out.push_str(operand.as_str());
        }
        out.push('\n');
    }
    out
}
