//! Signal labels.
//!
//! A [`Label`] names exactly one of the five disjoint signal kinds from the
//! data model: a constant, a primary input bit, a bit-expanded constant
//! (round constant or initial hash state), a gate, or an output alias. Gate
//! labels are opaque strings assigned by the synthesizer or optimizer;
//! every other kind has a fixed, parseable textual form so that the `§6`
//! text formats can round-trip through [`Label::parse`] and [`Display`].

use std::fmt;

/// The kind of entity a [`Label`] refers to, used to validate the
/// definition-before-use and output-cardinality invariants without
/// re-parsing the label text on every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Const0,
    Const1,
    Input { word: u8, bit: u8 },
    RoundConstant { index: u8, bit: u8 },
    InitialHash { index: u8, bit: u8 },
    Output { word: u8, bit: u8 },
    Gate,
}

/// A named signal. Cheaply cloned; interned to a small integer by the DAG
/// (`[crate::dag]`) for storage, but carried around as an owned string at
/// the parsing and reporting boundary where label text is the natural
/// currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub String);

impl Label {
    pub fn new(s: impl Into<String>) -> Self {
        Label(s.into())
    }

    pub fn const0() -> Self {
        Label("CONST-0".to_string())
    }

    pub fn const1() -> Self {
        Label("CONST-1".to_string())
    }

    pub fn input(word: u8, bit: u8) -> Self {
        Label(format!("INPUT-W{word}-B{bit}"))
    }

    pub fn round_constant(index: u8, bit: u8) -> Self {
        Label(format!("K-{index}-B{bit}"))
    }

    pub fn initial_hash(index: u8, bit: u8) -> Self {
        Label(format!("H-INIT-{index}-B{bit}"))
    }

    pub fn output(word: u8, bit: u8) -> Self {
        Label(format!("OUTPUT-W{word}-B{bit}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classifies a label by structural match against the reserved forms
    /// from `§3`. Anything that does not match one of those forms is
    /// assumed to be a gate label — gate labels have no fixed grammar,
    /// they are whatever the synthesizer or optimizer assigned.
    pub fn kind(&self) -> LabelKind {
        let s = self.0.as_str();
        if s == "CONST-0" {
            return LabelKind::Const0;
        }
        if s == "CONST-1" {
            return LabelKind::Const1;
        }
        if let Some(rest) = s.strip_prefix("INPUT-W") {
            if let Some((word, bit)) = split_word_bit(rest) {
                return LabelKind::Input { word, bit };
            }
        }
        if let Some(rest) = s.strip_prefix("OUTPUT-W") {
            if let Some((word, bit)) = split_word_bit(rest) {
                return LabelKind::Output { word, bit };
            }
        }
        if let Some(rest) = s.strip_prefix("H-INIT-") {
            if let Some((index, bit)) = split_index_bit(rest) {
                return LabelKind::InitialHash { index, bit };
            }
        }
        if let Some(rest) = s.strip_prefix("K-") {
            if let Some((index, bit)) = split_index_bit(rest) {
                return LabelKind::RoundConstant { index, bit };
            }
        }
        LabelKind::Gate
    }

    pub fn is_output(&self) -> bool {
        matches!(self.kind(), LabelKind::Output { .. })
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self.kind(), LabelKind::Gate)
    }
}

/// Splits `"{word}-B{bit}"` into its two numeric parts.
fn split_word_bit(rest: &str) -> Option<(u8, u8)> {
    let (word_str, bit_str) = rest.split_once("-B")?;
    let word = word_str.parse().ok()?;
    let bit = bit_str.parse().ok()?;
    Some((word, bit))
}

/// Splits `"{index}-B{bit}"` into its two numeric parts.
fn split_index_bit(rest: &str) -> Option<(u8, u8)> {
    let (index_str, bit_str) = rest.split_once("-B")?;
    let index = index_str.parse().ok()?;
    let bit = bit_str.parse().ok()?;
    Some((index, bit))
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_reserved_labels() {
        assert_eq!(Label::const0().kind(), LabelKind::Const0);
        assert_eq!(Label::const1().kind(), LabelKind::Const1);
        assert_eq!(
            Label::input(3, 7).kind(),
            LabelKind::Input { word: 3, bit: 7 }
        );
        assert_eq!(
            Label::round_constant(12, 4).kind(),
            LabelKind::RoundConstant { index: 12, bit: 4 }
        );
        assert_eq!(
            Label::initial_hash(2, 9).kind(),
            LabelKind::InitialHash { index: 2, bit: 9 }
        );
        assert_eq!(
            Label::output(5, 31).kind(),
            LabelKind::Output { word: 5, bit: 31 }
        );
    }

    #[test]
    fn gate_labels_have_no_fixed_grammar() {
        assert_eq!(Label::new("g1042").kind(), LabelKind::Gate);
        assert!(!Label::new("g1042").is_reserved());
    }

    #[test]
    fn display_round_trips_through_parse() {
        let l = Label::input(15, 31);
        assert_eq!(l.to_string(), "INPUT-W15-B31");
        assert_eq!(Label::new(l.to_string()).kind(), l.kind());
    }
}
