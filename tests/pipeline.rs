//! End-to-end pipeline tests: synthesize the full NAND circuit once,
//! optimize it, then evaluate it against concrete messages and compare
//! against the `sha2` reference crate, plus a few partially-unknown
//! three-valued scenarios.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use sha256_nand_circuit::eval::trivalue::Tri;
use sha256_nand_circuit::eval::{digest_bytes, evaluate, evaluate_bool, format_digest};
use sha256_nand_circuit::pad::PaddedMessage;
use sha256_nand_circuit::rewrite::Engine;
use sha256_nand_circuit::signal::Label;
use sha256_nand_circuit::synth;
use sha256_nand_circuit::word::consts::{H256_INIT, K256};

fn bit_at(value: u32, bit: u8) -> bool {
    (value >> bit as u32) & 1 == 1
}

fn full_bool_bindings(padded: &PaddedMessage) -> HashMap<Label, bool> {
    let mut bindings = HashMap::new();
    bindings.insert(Label::const0(), false);
    bindings.insert(Label::const1(), true);

    for (word, &value) in padded.words.iter().enumerate() {
        for bit in 0..32u8 {
            bindings.insert(Label::input(word as u8, bit), bit_at(value, bit));
        }
    }
    for (index, &value) in K256.iter().enumerate() {
        for bit in 0..32u8 {
            bindings.insert(Label::round_constant(index as u8, bit), bit_at(value, bit));
        }
    }
    for (index, &value) in H256_INIT.iter().enumerate() {
        for bit in 0..32u8 {
            bindings.insert(Label::initial_hash(index as u8, bit), bit_at(value, bit));
        }
    }
    bindings
}

fn digest_matches_reference(message: &[u8]) {
    let mut dag = synth::synthesize().expect("synthesis should succeed");
    let engine = Engine::new();
    let report = engine.optimize(&mut dag);
    assert!(report.converged, "optimizer did not converge on a well-formed circuit");
    dag.check_output_cardinality().unwrap();
    dag.check_topo_order().unwrap();

    let padded = PaddedMessage::pad(message).unwrap();
    let bindings = full_bool_bindings(&padded);
    let digest = evaluate_bool(&dag, &bindings);
    let circuit_bytes = digest_bytes(&digest);

    let reference = Sha256::digest(message);
    assert_eq!(
        circuit_bytes.as_slice(),
        reference.as_slice(),
        "circuit digest disagreed with sha2 for {}-byte message",
        message.len()
    );
}

#[test]
fn empty_message_matches_sha2() {
    digest_matches_reference(b"");
}

#[test]
fn single_letter_message_matches_sha2() {
    digest_matches_reference(b"a");
}

#[test]
fn hello_matches_sha2() {
    digest_matches_reference(b"hello");
}

#[test]
fn josh_matches_sha2() {
    digest_matches_reference(b"josh");
}

#[test]
fn fifty_five_byte_boundary_message_matches_sha2() {
    digest_matches_reference(&[0x61u8; 55]);
}

#[test]
fn unoptimized_circuit_agrees_with_optimized_circuit() {
    let message = b"hello";
    let padded = PaddedMessage::pad(message).unwrap();
    let bindings = full_bool_bindings(&padded);

    let raw = synth::synthesize().unwrap();
    let raw_digest = digest_bytes(&evaluate_bool(&raw, &bindings));

    let mut optimized = synth::synthesize().unwrap();
    Engine::new().optimize(&mut optimized);
    let optimized_digest = digest_bytes(&evaluate_bool(&optimized, &bindings));

    assert_eq!(raw_digest, optimized_digest);
}

#[test]
fn fully_unknown_input_yields_all_x_digest() {
    let dag = synth::synthesize().unwrap();
    // Every leaf other than the message bits is bound; the message bits
    // are left out of `bindings` entirely, so they evaluate to `Tri::X`
    // and that unknown should propagate to every one of the 256 outputs.
    let mut bindings: HashMap<Label, Tri> = HashMap::new();
    bindings.insert(Label::const0(), Tri::Zero);
    bindings.insert(Label::const1(), Tri::One);
    for index in 0..64u8 {
        for bit in 0..32u8 {
            bindings.insert(
                Label::round_constant(index, bit),
                Tri::from_bool(bit_at(K256[index as usize], bit)),
            );
        }
    }
    for index in 0..8u8 {
        for bit in 0..32u8 {
            bindings.insert(
                Label::initial_hash(index, bit),
                Tri::from_bool(bit_at(H256_INIT[index as usize], bit)),
            );
        }
    }

    let digest = evaluate(&dag, &bindings);
    let rendered = format_digest(&digest);
    assert_eq!(rendered, "x".repeat(64));
}

#[test]
fn one_unknown_input_bit_causes_full_avalanche_to_x() {
    let dag = synth::synthesize().unwrap();
    let padded = PaddedMessage::pad(b"").unwrap();
    let mut bindings: HashMap<Label, Tri> = HashMap::new();
    bindings.insert(Label::const0(), Tri::Zero);
    bindings.insert(Label::const1(), Tri::One);
    for (word, &value) in padded.words.iter().enumerate() {
        for bit in 0..32u8 {
            let label = Label::input(word as u8, bit);
            if word == 0 && bit == 0 {
                bindings.insert(label, Tri::X);
            } else {
                bindings.insert(label, Tri::from_bool(bit_at(value, bit)));
            }
        }
    }
    for index in 0..64u8 {
        for bit in 0..32u8 {
            bindings.insert(
                Label::round_constant(index, bit),
                Tri::from_bool(bit_at(K256[index as usize], bit)),
            );
        }
    }
    for index in 0..8u8 {
        for bit in 0..32u8 {
            bindings.insert(
                Label::initial_hash(index, bit),
                Tri::from_bool(bit_at(H256_INIT[index as usize], bit)),
            );
        }
    }

    let digest = evaluate(&dag, &bindings);
    let rendered = format_digest(&digest);
    assert_eq!(rendered, "x".repeat(64));
}

#[test]
fn synthesize_from_functions_round_trips_through_text_and_matches_reference() {
    let model = sha256_nand_circuit::word::generate_sha256_word_model();
    let functions_text = sha256_nand_circuit::io::write_functions(&model.ops);
    let ops = sha256_nand_circuit::io::parse_functions("functions.txt", &functions_text).unwrap();
    let mut dag = synth::synthesize_from_functions(&ops).unwrap();

    let nands_text = sha256_nand_circuit::io::write_nands(&mut dag).unwrap();
    let parsed = sha256_nand_circuit::io::parse_nands("nands.txt", &nands_text).unwrap();

    let padded = PaddedMessage::pad(b"hello").unwrap();
    let bindings = full_bool_bindings(&padded);
    let digest = digest_bytes(&evaluate_bool(&parsed, &bindings));
    let reference = Sha256::digest(b"hello");
    assert_eq!(digest.as_slice(), reference.as_slice());
}
