//! CLI front end for the SHA-256 NAND circuit pipeline.
//!
//! One subcommand per `§6` interface: generators for the reserved
//! input/constant files, the bit expander, the synthesizer, the rewrite
//! engine, the evaluator, and a differential `verify` driver against the
//! `sha2` reference crate. Every subcommand is a thin wrapper around the
//! library; no algorithmic content lives here.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use rand::Rng;
use sha2::{Digest, Sha256};

use sha256_nand_circuit::dag::Dag;
use sha256_nand_circuit::eval::trivalue::Tri;
use sha256_nand_circuit::eval::{digest_bytes, evaluate, evaluate_bool, format_digest};
use sha256_nand_circuit::io;
use sha256_nand_circuit::pad::PaddedMessage;
use sha256_nand_circuit::rewrite::Engine;
use sha256_nand_circuit::signal::Label;
use sha256_nand_circuit::synth;
use sha256_nand_circuit::word::consts::{H256_INIT, K256};
use sha256_nand_circuit::word::generate_sha256_word_model;

#[derive(Debug, Parser)]
#[command(name = "sha256circuit", about = "Synthesize, optimize, and evaluate a pure-NAND SHA-256 circuit")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Pad an ASCII or hex message into `input.txt` (word-level INPUT-W* bindings).
    GenerateInput {
        /// ASCII message text. Mutually exclusive with `--hex`.
        text: Option<String>,
        #[arg(long)]
        hex: Option<String>,
        #[arg(short, long, default_value = "input.txt")]
        output: PathBuf,
    },
    /// Emit `constants.txt`: the 64 round constants and 8 initial-hash words.
    GenerateConstants {
        #[arg(short, long, default_value = "constants.txt")]
        output: PathBuf,
    },
    /// Dump the word-level operation list (`functions.txt`).
    GenerateFunctions {
        #[arg(short, long, default_value = "functions.txt")]
        output: PathBuf,
    },
    /// Bit-expand a word-level binding file into its bit-level form.
    ExpandWords {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Also emit `CONST-0,0` and `CONST-1,1` (required for constants-bits.txt).
        #[arg(long)]
        add_constants: bool,
    },
    /// Synthesize `functions.txt` into a NAND DAG (`nands.txt`).
    Synthesize {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Optimize a NAND DAG to a fixed point.
    Optimize {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        constants: PathBuf,
        #[arg(long)]
        max_rounds: Option<usize>,
    },
    /// Evaluate a NAND DAG under two- or three-valued logic.
    Evaluate {
        #[arg(short = 'n', long)]
        nands: PathBuf,
        /// Bit-level binding files; pass this flag once per file (input bits, constant bits, ...).
        #[arg(short = 'i', long = "input", required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Differentially test a NAND DAG against the `sha2` crate on random messages.
    Verify {
        #[arg(short = 'n', long)]
        nands: PathBuf,
        #[arg(short = 't', long, default_value_t = 100)]
        trials: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.cmd {
        Cmd::GenerateInput { text, hex, output } => generate_input(text, hex, output),
        Cmd::GenerateConstants { output } => generate_constants(output),
        Cmd::GenerateFunctions { output } => generate_functions(output),
        Cmd::ExpandWords {
            input,
            output,
            add_constants,
        } => expand_words(input, output, add_constants),
        Cmd::Synthesize { input, output } => synthesize_cmd(input, output),
        Cmd::Optimize {
            input,
            output,
            constants,
            max_rounds,
        } => optimize_cmd(input, output, constants, max_rounds),
        Cmd::Evaluate {
            nands,
            inputs,
            output,
        } => evaluate_cmd(nands, inputs, output),
        Cmd::Verify { nands, trials } => verify_cmd(nands, trials),
    }
}

fn generate_input(text: Option<String>, hex: Option<String>, output: PathBuf) -> Result<()> {
    let padded = match (text, hex) {
        (Some(t), None) => PaddedMessage::from_text(&t)?,
        (None, Some(h)) => PaddedMessage::from_hex(&h)?,
        (None, None) => bail!("generate-input requires either a text argument or --hex"),
        (Some(_), Some(_)) => bail!("generate-input takes either a text argument or --hex, not both"),
    };
    let bindings = word_bindings_from_words("INPUT-W", &padded.words);
    fs::write(&output, io::write_word_bindings(&bindings))
        .with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn generate_constants(output: PathBuf) -> Result<()> {
    let mut bindings = word_bindings_from_words("K-", &K256);
    bindings.extend(word_bindings_from_words("H-INIT-", &H256_INIT));
    fs::write(&output, io::write_word_bindings(&bindings))
        .with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Builds word-level bindings for a fixed-prefix label family (`INPUT-W*`,
/// `K-*`, `H-INIT-*`) from literal 32-bit values, all bits fully known.
fn word_bindings_from_words(prefix: &str, values: &[u32]) -> Vec<(Label, [Tri; 32])> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let mut bits = [Tri::Zero; 32];
            for (bit, slot) in bits.iter_mut().enumerate() {
                *slot = Tri::from_bool((value >> bit as u32) & 1 == 1);
            }
            (Label::new(format!("{prefix}{i}")), bits)
        })
        .collect()
}

fn generate_functions(output: PathBuf) -> Result<()> {
    let model = generate_sha256_word_model();
    fs::write(&output, io::write_functions(&model.ops))
        .with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {} ({} operations)", output.display(), model.ops.len());
    Ok(())
}

fn expand_words(input: PathBuf, output: PathBuf, add_constants: bool) -> Result<()> {
    let contents = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let words = io::parse_word_bindings(&input.to_string_lossy(), &contents)?;

    let mut bit_bindings = Vec::new();
    if add_constants {
        bit_bindings.push((Label::const0(), Tri::Zero));
        bit_bindings.push((Label::const1(), Tri::One));
    }
    for (label, bits) in &words {
        let bit_labels = sha256_nand_circuit::bits::expand_word(label);
        for (bl, v) in bit_labels.iter().zip(bits.iter()) {
            bit_bindings.push((bl.clone(), *v));
        }
    }

    fs::write(&output, io::write_bit_bindings(&bit_bindings))
        .with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {} ({} bits)", output.display(), bit_bindings.len());
    Ok(())
}

fn synthesize_cmd(input: PathBuf, output: PathBuf) -> Result<()> {
    let contents = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let ops = io::parse_functions(&input.to_string_lossy(), &contents)?;
    let mut dag = synth::synthesize_from_functions(&ops)?;
    info!("synthesized {} gates from {} operations", dag.nb_gates(), ops.len());
    fs::write(&output, io::write_nands(&mut dag)?)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn optimize_cmd(
    input: PathBuf,
    output: PathBuf,
    constants: PathBuf,
    max_rounds: Option<usize>,
) -> Result<()> {
    let nands_text = fs::read_to_string(&input).with_context(|| format!("reading {}", input.display()))?;
    let mut dag = io::parse_nands(&input.to_string_lossy(), &nands_text)?;

    // The constants-bits.txt file is validated for shape (§6) but the
    // optimizer's constant-folding pass (C1) derives known values
    // directly from `crate::word::consts`, since those are message-
    // independent and already baked into the reserved leaf set — the
    // file's role here is a conformance check that the caller's
    // constants agree with what the circuit was built against.
    let constants_text =
        fs::read_to_string(&constants).with_context(|| format!("reading {}", constants.display()))?;
    let constant_bindings = io::parse_bit_bindings(&constants.to_string_lossy(), &constants_text)?;
    verify_constants_match(&dag, &constant_bindings)?;

    let engine = match max_rounds {
        Some(n) => Engine::with_max_rounds(n),
        None => Engine::new(),
    };
    let report = engine.optimize(&mut dag);
    info!(
        "optimize: {} -> {} gates in {} rounds (converged={})",
        report.initial_gates, report.final_gates, report.rounds_run, report.converged
    );

    fs::write(&output, io::write_nands(&mut dag)?)
        .with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

/// Checks that every known bit in the caller's `constants-bits.txt`
/// agrees with the literal SHA-256 round constants and initial hash
/// state this crate bakes in (`crate::word::consts`). A mismatch means
/// the caller handed the optimizer a constants file that does not
/// describe this SHA-256 instance; the optimizer's constant-folding pass
/// (C1) always trusts the baked-in values, so a silently-ignored
/// mismatch here would make `-c` a misleading no-op.
fn verify_constants_match(dag: &Dag, bindings: &[(Label, Tri)]) -> Result<()> {
    for (label, value) in bindings {
        let Some(expected) = expected_constant_value(label) else {
            continue;
        };
        if let Some(got) = value.as_bool() {
            if got != expected {
                bail!("{label} in constants file is {got} but the circuit bakes in {expected}");
            }
        }
        if dag.id_of(label).is_none() {
            bail!("{label} is not a reserved leaf in this circuit");
        }
    }
    Ok(())
}

/// The literal bit value a reserved constant label is bound to, or
/// `None` if `label` is not one of `CONST-0`/`CONST-1`/`K-*`/`H-INIT-*`.
fn expected_constant_value(label: &Label) -> Option<bool> {
    use sha256_nand_circuit::signal::LabelKind;
    match label.kind() {
        LabelKind::Const0 => Some(false),
        LabelKind::Const1 => Some(true),
        LabelKind::RoundConstant { index, bit } => {
            Some(bit_at(K256[index as usize], bit))
        }
        LabelKind::InitialHash { index, bit } => {
            Some(bit_at(H256_INIT[index as usize], bit))
        }
        _ => None,
    }
}

fn evaluate_cmd(nands: PathBuf, inputs: Vec<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let nands_text = fs::read_to_string(&nands).with_context(|| format!("reading {}", nands.display()))?;
    let dag = io::parse_nands(&nands.to_string_lossy(), &nands_text)?;

    let mut bindings: HashMap<Label, Tri> = HashMap::new();
    for input in &inputs {
        let contents = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
        for (label, value) in io::parse_bit_bindings(&input.to_string_lossy(), &contents)? {
            bindings.insert(label, value);
        }
    }

    let digest = evaluate(&dag, &bindings);
    let rendered = format_digest(&digest);
    match output {
        Some(path) => {
            fs::write(&path, format!("{rendered}\n")).with_context(|| format!("writing {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn verify_cmd(nands: PathBuf, trials: usize) -> Result<()> {
    let nands_text = fs::read_to_string(&nands).with_context(|| format!("reading {}", nands.display()))?;
    let dag = io::parse_nands(&nands.to_string_lossy(), &nands_text)?;

    let mut rng = rand::thread_rng();
    let mut mismatches = 0usize;
    for trial in 0..trials {
        let len = rng.gen_range(0..=sha256_nand_circuit::pad::MAX_MESSAGE_BYTES);
        let message: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

        let padded = PaddedMessage::pad(&message)?;
        let bindings = full_bool_bindings(&padded);
        let digest = evaluate_bool(&dag, &bindings);
        let circuit_digest = digest_bytes(&digest);

        let reference_digest = Sha256::digest(&message);
        if circuit_digest.as_slice() != reference_digest.as_slice() {
            mismatches += 1;
            eprintln!(
                "trial {trial}: mismatch for {}-byte message: circuit={} reference={}",
                message.len(),
                hex::encode(circuit_digest),
                hex::encode(reference_digest)
            );
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} of {trials} trials mismatched the sha2 reference");
    }
    info!("verify: {trials} trials, all matched the sha2 reference");
    Ok(())
}

/// Assembles the fully-bound two-valued leaf bindings for one concrete
/// message: the padded input words plus the message-independent round
/// constants and initial hash state.
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

fn bit_at(value: u32, bit: u8) -> bool {
    (value >> bit as u32) & 1 == 1
}
