//! Turning a groth16 proof into arguments for the on-chain verifier
//!
//! Two formatters produce the same [`CallArgs`]:
//! - [`SnarkjsCli`] writes `proof.json` / `public.json` into a fresh
//!   per-request directory and runs `snarkjs generatecall` there
//! - [`ProofFormatter::Native`] reorders the proof coordinates in process

use alloy::primitives::U256;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;
use uuid::Uuid;

use crate::config::{Config, ProverKind};

pub const PROOF_FILE: &str = "proof.json";
pub const PUBLIC_FILE: &str = "public.json";

/// Arguments of the verifier's `transfer(login, a, b, c, input, ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgs {
    pub a: [U256; 2],
    pub b: [[U256; 2]; 2],
    pub c: [U256; 2],
    pub input: Vec<U256>,
}

#[derive(Error, Debug)]
pub enum ProverError {
    #[error("failed to write proof artifacts: {0}")]
    Artifacts(#[source] std::io::Error),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{program} reported: {stderr}")]
    Stderr { program: String, stderr: String },

    #[error("unexpected generatecall output: {0}")]
    Output(String),

    #[error("unsupported proof: {0}")]
    UnsupportedProof(String),
}

pub enum ProofFormatter {
    Snarkjs(SnarkjsCli),
    Native,
}

impl ProofFormatter {
    pub fn from_config(config: &Config) -> Self {
        match config.prover {
            ProverKind::Snarkjs => Self::Snarkjs(SnarkjsCli::new(
                config.snarkjs_bin.clone(),
                config.artifacts_dir.clone(),
            )),
            ProverKind::Native => Self::Native,
        }
    }

    pub async fn generate_call(
        &self,
        proof: &Value,
        public_signals: &[String],
    ) -> Result<CallArgs, ProverError> {
        match self {
            Self::Snarkjs(cli) => cli.generate_call(proof, public_signals).await,
            Self::Native => format_groth16(proof, public_signals),
        }
    }
}

/// Runs the snarkjs CLI (or anything speaking its `generatecall` output).
pub struct SnarkjsCli {
    program: String,
    args: Vec<String>,
    artifacts_dir: PathBuf,
}

impl SnarkjsCli {
    pub fn new(program: impl Into<String>, artifacts_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["generatecall".to_string()],
            artifacts_dir: artifacts_dir.into(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub async fn generate_call(
        &self,
        proof: &Value,
        public_signals: &[String],
    ) -> Result<CallArgs, ProverError> {
        let workdir = self.artifacts_dir.join(format!("login-{}", Uuid::new_v4()));

        let result = self.run_in(&workdir, proof, public_signals).await;

        if let Err(e) = tokio::fs::remove_dir_all(&workdir).await {
            tracing::warn!(
                dir = %workdir.display(),
                error = %e,
                "failed to remove proof artifacts"
            );
        }

        result
    }

    async fn run_in(
        &self,
        workdir: &Path,
        proof: &Value,
        public_signals: &[String],
    ) -> Result<CallArgs, ProverError> {
        write_artifacts(workdir, proof, public_signals).await?;

        tracing::info!(program = %self.program, dir = %workdir.display(), "running generatecall");

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workdir)
            .output()
            .await
            .map_err(|source| ProverError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(ProverError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr,
            });
        }
        if !stderr.is_empty() {
            return Err(ProverError::Stderr {
                program: self.program.clone(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        tracing::debug!(output = %stdout.trim(), "generatecall finished");

        parse_generatecall(&stdout)
    }
}

async fn write_artifacts(
    workdir: &Path,
    proof: &Value,
    public_signals: &[String],
) -> Result<(), ProverError> {
    let proof_json = serde_json::to_string_pretty(proof)
        .map_err(|e| ProverError::Artifacts(e.into()))?;
    let public_json = serde_json::to_string_pretty(public_signals)
        .map_err(|e| ProverError::Artifacts(e.into()))?;

    tokio::fs::create_dir_all(workdir)
        .await
        .map_err(ProverError::Artifacts)?;
    tokio::fs::write(workdir.join(PROOF_FILE), proof_json)
        .await
        .map_err(ProverError::Artifacts)?;
    tokio::fs::write(workdir.join(PUBLIC_FILE), public_json)
        .await
        .map_err(ProverError::Artifacts)?;

    Ok(())
}

/// Parse `generatecall` stdout: four comma separated JSON values that only
/// form an array once wrapped in brackets.
pub fn parse_generatecall(stdout: &str) -> Result<CallArgs, ProverError> {
    type RawCall = ([String; 2], [[String; 2]; 2], [String; 2], Vec<String>);

    let (a, b, c, input): RawCall = serde_json::from_str(&format!("[{}]", stdout.trim()))
        .map_err(|e| ProverError::Output(e.to_string()))?;

    Ok(CallArgs {
        a: [parse_uint(&a[0])?, parse_uint(&a[1])?],
        b: [
            [parse_uint(&b[0][0])?, parse_uint(&b[0][1])?],
            [parse_uint(&b[1][0])?, parse_uint(&b[1][1])?],
        ],
        c: [parse_uint(&c[0])?, parse_uint(&c[1])?],
        input: input
            .iter()
            .map(|s| parse_uint(s))
            .collect::<Result<_, _>>()?,
    })
}

fn parse_uint(value: &str) -> Result<U256, ProverError> {
    value
        .trim()
        .parse()
        .map_err(|e| ProverError::Output(format!("{value:?} is not a uint256: {e}")))
}

#[derive(Deserialize)]
struct Groth16Proof {
    pi_a: Vec<String>,
    pi_b: Vec<Vec<String>>,
    pi_c: Vec<String>,
    #[serde(default)]
    protocol: Option<String>,
}

/// In-process equivalent of `snarkjs generatecall` for groth16 proofs.
/// The G2 point `b` has its coordinate pairs swapped for the EVM precompile.
pub fn format_groth16(proof: &Value, public_signals: &[String]) -> Result<CallArgs, ProverError> {
    let proof = Groth16Proof::deserialize(proof)
        .map_err(|e| ProverError::UnsupportedProof(e.to_string()))?;

    if let Some(protocol) = proof.protocol.as_deref() {
        if protocol != "groth16" {
            return Err(ProverError::UnsupportedProof(format!(
                "protocol {protocol} is not groth16"
            )));
        }
    }

    let b0 = proof.pi_b.first().map(Vec::as_slice).unwrap_or_default();
    let b1 = proof.pi_b.get(1).map(Vec::as_slice).unwrap_or_default();

    Ok(CallArgs {
        a: [coord(&proof.pi_a, 0, "pi_a")?, coord(&proof.pi_a, 1, "pi_a")?],
        b: [
            [coord(b0, 1, "pi_b[0]")?, coord(b0, 0, "pi_b[0]")?],
            [coord(b1, 1, "pi_b[1]")?, coord(b1, 0, "pi_b[1]")?],
        ],
        c: [coord(&proof.pi_c, 0, "pi_c")?, coord(&proof.pi_c, 1, "pi_c")?],
        input: public_signals
            .iter()
            .map(|s| proof_uint(s, "publicSignals"))
            .collect::<Result<_, _>>()?,
    })
}

fn coord(values: &[String], index: usize, field: &str) -> Result<U256, ProverError> {
    let value = values
        .get(index)
        .ok_or_else(|| ProverError::UnsupportedProof(format!("{field} has no element {index}")))?;
    proof_uint(value, field)
}

fn proof_uint(value: &str, field: &str) -> Result<U256, ProverError> {
    value.parse().map_err(|e| {
        ProverError::UnsupportedProof(format!("{field}: {value:?} is not a uint256: {e}"))
    })
}
