//! Three-valued logic for the evaluator (`V`, `§4.3`).
//!
//! `Tri::X` stands for an unknown bit. The NAND truth table over `Tri` is
//! conservative: it only resolves to a known value when the known inputs
//! alone force it, regardless of what the unknown input turns out to be.
//! `NAND(0, X) = 1` (the first input being 0 forces the output to 1 no
//! matter what `X` is), but `NAND(1, X) = X` (either value of `X` changes
//! the output), and `NAND(X, X) = X` for the same reason.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tri {
    Zero,
    One,
    X,
}

impl Tri {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Tri::One
        } else {
            Tri::Zero
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Tri::Zero => Some(false),
            Tri::One => Some(true),
            Tri::X => None,
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, Tri::X)
    }
}

/// The conservative three-valued NAND truth table.
pub fn nand(a: Tri, b: Tri) -> Tri {
    match (a, b) {
        (Tri::Zero, _) | (_, Tri::Zero) => Tri::One,
        (Tri::One, Tri::One) => Tri::Zero,
        (Tri::One, Tri::X) => Tri::X,
        (Tri::X, Tri::One) => Tri::X,
        (Tri::X, Tri::X) => Tri::X,
    }
}

impl fmt::Display for Tri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tri::Zero => write!(f, "0"),
            Tri::One => write!(f, "1"),
            Tri::X => write!(f, "x"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_zero_input_always_forces_one() {
        assert_eq!(nand(Tri::Zero, Tri::X), Tri::One);
        assert_eq!(nand(Tri::X, Tri::Zero), Tri::One);
    }

    #[test]
    fn both_ones_is_zero() {
        assert_eq!(nand(Tri::One, Tri::One), Tri::Zero);
    }

    #[test]
    fn one_and_unknown_is_unknown() {
        assert_eq!(nand(Tri::One, Tri::X), Tri::X);
        assert_eq!(nand(Tri::X, Tri::X), Tri::X);
    }

    #[test]
    fn matches_boolean_nand_when_fully_known() {
        for a in [false, true] {
            for b in [false, true] {
                let expected = !(a && b);
                let got = nand(Tri::from_bool(a), Tri::from_bool(b));
                assert_eq!(got.as_bool(), Some(expected));
            }
        }
    }
}
