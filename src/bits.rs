//! The bit expander (`E`): lifts a 32-bit word label from the word model
//! into the 32 individually labeled bit signals the synthesizer wires
//! gates between (`§3`, `§4.1`, `§6`).
//!
//! Three of the word model's label families have a fixed bit-level form
//! already reserved by [`crate::signal::Label`]: `INPUT-Wi`, `K-i`, and
//! `H-INIT-i` expand to `INPUT-Wi-Bj`, `K-i-Bj`, and `H-INIT-i-Bj`
//! respectively. Every other word label is a synthetic temporary the word
//! model generator minted (`t0`, `t1`, ...); those expand to `{label}-Bj`,
//! which can never collide with a reserved prefix since none of them start
//! with `t` followed by digits only (`§9`'s label-uniqueness invariant
//! holds across both families for that reason).

use crate::signal::Label;

/// Bit order within a word: bit 0 is the least significant bit, bit 31 the
/// most significant (`§3`, `§6`: "`-B0` is LSB, `-B31` is MSB").
pub const BITS_PER_WORD: u8 = 32;

/// Expands a single word-level label into its 32 bit-level labels, indexed
/// `[bit 0 (LSB) ..= bit 31 (MSB)]` to match `§3`'s bit-ordering convention.
pub fn expand_word(label: &Label) -> [Label; 32] {
    let bits: Vec<Label> = if let Some(rest) = label.as_str().strip_prefix("INPUT-W") {
        if let Ok(word) = rest.parse::<u8>() {
            (0..BITS_PER_WORD).map(|b| Label::input(word, b)).collect()
        } else {
            synthetic_bits(label)
        }
    } else if let Some(rest) = label.as_str().strip_prefix("K-") {
        if let Ok(index) = rest.parse::<u8>() {
            (0..BITS_PER_WORD)
                .map(|b| Label::round_constant(index, b))
                .collect()
        } else {
            synthetic_bits(label)
        }
    } else if let Some(rest) = label.as_str().strip_prefix("H-INIT-") {
        if let Ok(index) = rest.parse::<u8>() {
            (0..BITS_PER_WORD)
                .map(|b| Label::initial_hash(index, b))
                .collect()
        } else {
            synthetic_bits(label)
        }
    } else {
        synthetic_bits(label)
    };

    bits.try_into()
        .unwrap_or_else(|_| panic!("expand_word must produce exactly 32 bits"))
}

fn synthetic_bits(label: &Label) -> Vec<Label> {
    (0..BITS_PER_WORD)
        .map(|b| Label::new(format!("{}-B{b}", label.as_str())))
        .collect()
}

/// Expands one of the eight final compression-state words from the word
/// model into its 32 bit labels, for binding against `OUTPUT-Wi-Bj`.
pub fn expand_final_words(final_words: &[Label; 8]) -> [[Label; 32]; 8] {
    let mut out: Vec<[Label; 32]> = Vec::with_capacity(8);
    for w in final_words {
        out.push(expand_word(w));
    }
    out.try_into()
        .unwrap_or_else(|_| panic!("expand_final_words must produce exactly 8 words"))
}
