//! The word model (`W`): SHA-256's compression function expressed as a
//! fixed sequence of 32-bit operations over labeled words, independent of
//! any particular message (`§3`, `§4.1`).

pub mod consts;
pub mod model;
pub mod ops;

pub use model::{generate_sha256_word_model, WordModel};
pub use ops::WordOp;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Label;
    use std::collections::HashSet;

    #[test]
    fn references_only_reserved_word_labels_or_prior_temporaries() {
        let model = generate_sha256_word_model();
        let mut defined: HashSet<String> = HashSet::new();
        for i in 0..16u8 {
            defined.insert(format!("INPUT-W{i}"));
        }
        for i in 0..64u8 {
            defined.insert(format!("K-{i}"));
        }
        for i in 0..8u8 {
            defined.insert(format!("H-INIT-{i}"));
        }

        for (label, op) in &model.ops {
            for operand in op.operands() {
                assert!(
                    defined.contains(operand.as_str()),
                    "operand {operand:?} of {label:?} used before definition"
                );
            }
            defined.insert(label.as_str().to_string());
        }

        for fw in &model.final_words {
            assert!(defined.contains(fw.as_str()));
        }
    }

    #[test]
    fn produces_eight_distinct_final_words() {
        let model = generate_sha256_word_model();
        let unique: HashSet<&str> = model.final_words.iter().map(Label::as_str).collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn message_schedule_uses_shift_counts_from_fips_180_4() {
        let model = generate_sha256_word_model();
        let shift_counts: Vec<u32> = model
            .ops
            .iter()
            .filter_map(|(_, op)| match op {
                WordOp::Shr(_, n) => Some(*n),
                _ => None,
            })
            .collect();
        assert!(shift_counts.contains(&3));
        assert!(shift_counts.contains(&10));
    }

    #[test]
    fn opcode_vocabulary_matches_functions_txt_grammar() {
        let model = generate_sha256_word_model();
        for (_, op) in &model.ops {
            let s = op.opcode_str();
            assert!(
                s == "COPY"
                    || s == "NOT"
                    || s == "AND"
                    || s == "OR"
                    || s == "XOR"
                    || s == "ADD"
                    || s == "CH"
                    || s == "MAJ"
                    || s.starts_with("ROTR")
                    || s.starts_with("SHR"),
                "unexpected opcode {s}"
            );
        }
    }
}
