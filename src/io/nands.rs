//! `nands.txt`: the gate-level NAND listing, `LABEL,A,B` (`§6`).
//!
//! Every live internal gate is written under its own label, plus one
//! pass-through line per `OUTPUT-Wi-Bj` so the 256 outputs are locatable
//! by label alone, without a separate alias table (`§4.1` "Output
//! binding"). The reserved leaves (`CONST-0/1`, `INPUT-*`, `K-*`,
//! `H-INIT-*`) are never written — the parser re-interns them before
//! reading any gate line, exactly as the synthesizer does.

use crate::dag::Dag;
use crate::error::{Error, Result};
use crate::signal::Label;

/// Serializes every live gate in `dag`, in definition order, after
/// materializing the 256 `OUTPUT-Wi-Bj` pass-through gates
/// ([`Dag::materialize_outputs`]).
pub fn write_nands(dag: &mut Dag) -> Result<String> {
    dag.materialize_outputs()?;
    let mut out = String::new();
    for (label, a, b) in dag.iter_gate_definitions() {
        out.push_str(label.as_str());
        out.push(',');
        out.push_str(a.as_str());
        out.push(',');
        out.push_str(b.as_str());
        out.push('\n');
    }
    Ok(out)
}

/// Parses a `nands.txt` listing into a fresh [`Dag`]: interns the
/// reserved leaf set, then replays each `LABEL,A,B` line as a gate
/// definition in file order. A line whose label matches the
/// `OUTPUT-Wi-Bj` grammar both defines the gate and binds the
/// corresponding output alias, mirroring how [`write_nands`] serialized
/// it.
pub fn parse_nands(file: &str, contents: &str) -> Result<Dag> {
    let mut dag = Dag::new();
    dag.intern_reserved_leaves()?;

    for (idx, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let malformed = || Error::MalformedLine {
            file: file.to_string(),
            line: line_no,
            text: line.to_string(),
        };

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 3 {
            return Err(malformed());
        }
        let label = Label::new(fields[0]);
        let a_label = Label::new(fields[1]);
        let b_label = Label::new(fields[2]);

        let a_id = dag.id_of(&a_label).ok_or_else(|| Error::UndefinedReference {
            file: file.to_string(),
            line: line_no,
            referrer: label.as_str().to_string(),
            reference: a_label.as_str().to_string(),
        })?;
        let b_id = dag.id_of(&b_label).ok_or_else(|| Error::UndefinedReference {
            file: file.to_string(),
            line: line_no,
            referrer: label.as_str().to_string(),
            reference: b_label.as_str().to_string(),
        })?;

        if dag.id_of(&label).is_some() {
            return Err(Error::DuplicateLabel {
                file: file.to_string(),
                label: label.as_str().to_string(),
                first_line: 0,
                second_line: line_no,
            });
        }

        let id = dag.define_gate(label.clone(), a_id, b_id)?;
        if let crate::signal::LabelKind::Output { word, bit } = label.kind() {
            dag.bind_output(word, bit, id);
        }
    }

    dag.check_topo_order()?;
    dag.check_output_cardinality()?;
    Ok(dag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Label as L;

    #[test]
    fn lists_one_line_per_live_gate_plus_materialized_outputs() {
        let mut dag = Dag::new();
        let a = dag.intern_leaf(L::new("a")).unwrap();
        let b = dag.intern_leaf(L::new("b")).unwrap();
        let g = dag.nand(a, b);
        dag.bind_output(0, 0, g);
        let text = write_nands(&mut dag).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3); // original gate + inverter + OUTPUT pass-through
        assert!(lines.iter().any(|l| l.starts_with("OUTPUT-W0-B0,")));
    }

    #[test]
    fn round_trips_a_full_synthesized_circuit() {
        let mut dag = crate::synth::synthesize().unwrap();
        let text = write_nands(&mut dag).unwrap();
        let parsed = parse_nands("nands.txt", &text).unwrap();
        parsed.check_output_cardinality().unwrap();
        parsed.check_topo_order().unwrap();
        assert_eq!(parsed.output_alias().len(), 256);
    }

    #[test]
    fn rejects_a_reference_to_an_undefined_label() {
        let err = parse_nands("f", "g0,NOT-DEFINED,CONST-0\n").unwrap_err();
        assert!(matches!(err, Error::UndefinedReference { .. }));
    }

    #[test]
    fn rejects_a_duplicate_label() {
        let contents = "g0,CONST-0,CONST-1\ng0,CONST-1,CONST-0\n";
        let err = parse_nands("f", contents).unwrap_err();
        assert!(matches!(err, Error::DuplicateLabel { .. }));
    }
}
