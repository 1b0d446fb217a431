use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use groupsig_lib::anonymity::builder::SkippedKey;
use groupsig_lib::anonymity::merkle::MerkleProofJson;
use groupsig_lib::anonymity::roster::Roster;
use groupsig_lib::convert::fp_to_integer;
use groupsig_lib::create_input::{create_prover_input, create_verifier_input, PreparedInput, ProverInput};
use groupsig_lib::CircuitParams;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Prepare inputs for an anonymous group-signature proof
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the prover's input bundle from a signature, a roster and a message
    Prove(ProveArgs),
    /// Print the public signals a verifier recomputes from the roster and message
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct CircuitArgs {
    /// JSON file with circuit parameters; unset fields keep their defaults
    #[arg(long, env = "GROUPSIG_PARAMS")]
    params: Option<PathBuf>,
    /// Slots in the anonymity set
    #[arg(long, env = "GROUPSIG_MAX_KEYS")]
    max_keys: Option<usize>,
    /// RSA modulus size in bits
    #[arg(long, env = "GROUPSIG_MODULUS_BITS")]
    modulus_bits: Option<usize>,
    /// Bits per limb
    #[arg(long, env = "GROUPSIG_LIMB_WIDTH")]
    limb_width: Option<usize>,
}

#[derive(Args, Debug)]
struct MessageArgs {
    /// Group roster (`{"group_members": ...}`)
    #[arg(long)]
    gpk: PathBuf,
    /// Message to sign; read from stdin when omitted
    #[arg(long)]
    message: Option<String>,
}

#[derive(Args, Debug)]
struct ProveArgs {
    /// Armored SSHSIG signature over the double-blind string
    #[arg(long)]
    sig: PathBuf,
    #[command(flatten)]
    input: MessageArgs,
    #[command(flatten)]
    circuit: CircuitArgs,
    /// Output file for the input bundle
    #[arg(long, default_value = "input.json")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    #[command(flatten)]
    input: MessageArgs,
    #[command(flatten)]
    circuit: CircuitArgs,
}

/// The file handed to the proving engine
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InputDocument<'a> {
    #[serde(flatten)]
    inputs: &'a ProverInput,
    public_signals: Vec<String>,
    merkle_root: String,
    merkle_proof: MerkleProofJson,
    skipped: &'a [SkippedKey],
}

impl<'a> InputDocument<'a> {
    fn new(prepared: &'a PreparedInput) -> Self {
        InputDocument {
            inputs: &prepared.inputs,
            public_signals: prepared.inputs.public_signals(),
            merkle_root: fp_to_integer(&prepared.merkle_root).to_string_radix(10),
            merkle_proof: prepared.merkle_proof.to_json(),
            skipped: &prepared.skipped,
        }
    }
}

fn load_params(args: &CircuitArgs) -> Result<CircuitParams> {
    let mut params: CircuitParams = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read params file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse params file {}", path.display()))?
        }
        None => CircuitParams::default(),
    };
    if let Some(max_keys) = args.max_keys {
        params.max_keys = max_keys;
    }
    if let Some(modulus_bits) = args.modulus_bits {
        params.modulus_bits = modulus_bits;
    }
    if let Some(limb_width) = args.limb_width {
        params.limb_width = limb_width;
    }
    params.validate().context("invalid circuit parameters")?;
    Ok(params)
}

fn load_roster(path: &Path) -> Result<Roster> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    Roster::from_json(&text).with_context(|| format!("failed to parse roster {}", path.display()))
}

fn read_message(message: Option<&str>) -> Result<String> {
    if let Some(message) = message {
        return Ok(message.to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read message from stdin")?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

fn prove(args: ProveArgs) -> Result<()> {
    let params = load_params(&args.circuit)?;
    let roster = load_roster(&args.input.gpk)?;
    let signature = fs::read_to_string(&args.sig)
        .with_context(|| format!("failed to read signature {}", args.sig.display()))?;
    let message = read_message(args.input.message.as_deref())?;

    let prepared = create_prover_input(&message, &signature, &roster, &params)
        .context("failed to build prover input")?;
    if !prepared.signature_matches() {
        bail!(
            "signature does not cover {:?} under namespace {:?}; the proof would fail",
            params.double_blind_message,
            params.namespace
        );
    }
    if !prepared.skipped.is_empty() {
        warn!(skipped = prepared.skipped.len(), "roster keys left out of the group are listed under `skipped`");
    }

    let document = serde_json::to_string_pretty(&InputDocument::new(&prepared))?;
    fs::write(&args.out, document)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!(
        out = %args.out.display(),
        signer_index = prepared.signer_index,
        real_members = prepared.real_members,
        "wrote prover input"
    );
    Ok(())
}

fn verify(args: VerifyArgs) -> Result<()> {
    let params = load_params(&args.circuit)?;
    let roster = load_roster(&args.input.gpk)?;
    let message = read_message(args.input.message.as_deref())?;
    let signals = create_verifier_input(&message, &roster, &params)
        .context("failed to build verifier input")?;
    println!("{}", serde_json::to_string(&signals)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Prove(args) => prove(args),
        Command::Verify(args) => verify(args),
    }
}
