//! Lookup of compiled contract artifacts on disk.
//!
//! Both the Hardhat layout (`artifacts/contracts/Foo.sol/Foo.json`, with a
//! top-level `bytecode` string) and the Foundry layout (`out/Foo.sol/Foo.json`,
//! with `bytecode.object`) are understood.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::primitives::{hex, Bytes};
use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{ARTIFACT_EXTENSION, BUILD_INFO_DIR, FULLY_QUALIFIED_NAME_SEPARATOR},
    errors::ScriptError,
};

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
}

/// The subset of an artifact file the deploy script reads
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    /// The contract name, only present in Hardhat artifacts
    contract_name: Option<String>,
    /// The creation bytecode
    bytecode: ArtifactBytecode,
}

/// Creation bytecode, in either of the supported layouts
#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactBytecode {
    /// Hardhat: `"bytecode": "0x..."`
    Hex(String),
    /// Foundry: `"bytecode": { "object": "0x..." }`
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

impl ArtifactBytecode {
    /// The hex-encoded bytecode
    fn hex(&self) -> &str {
        match self {
            ArtifactBytecode::Hex(s) => s,
            ArtifactBytecode::Object { object } => object,
        }
    }
}

/// A registry of the compiled artifacts under a single root directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    /// The root of the artifacts tree
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store reading artifacts from under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root of the artifacts tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a contract by name.
    ///
    /// `name` is either a bare contract name (`Foo`), which must be unique in
    /// the tree, or a fully qualified one (`contracts/Foo.sol:Foo`).
    pub fn resolve(&self, name: &str) -> Result<ContractArtifact, ScriptError> {
        let (path, contract_name) = match name.rsplit_once(FULLY_QUALIFIED_NAME_SEPARATOR) {
            Some((source, contract_name)) => {
                let path = self
                    .root
                    .join(source)
                    .join(contract_name)
                    .with_extension(ARTIFACT_EXTENSION);
                if !path.is_file() {
                    return Err(ScriptError::ArtifactNotFound(format!(
                        "no artifact for `{name}` at {}",
                        path.display()
                    )));
                }
                (path, contract_name)
            }
            None => (self.find_unique(name)?, name),
        };

        debug!("resolved `{name}` to artifact {}", path.display());
        read_artifact(&path, contract_name)
    }

    /// Find the single artifact file for a bare contract name
    fn find_unique(&self, name: &str) -> Result<PathBuf, ScriptError> {
        if !self.root.is_dir() {
            return Err(ScriptError::ArtifactNotFound(format!(
                "artifacts directory {} does not exist, have the contracts been compiled?",
                self.root.display()
            )));
        }

        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        let mut candidates = Vec::new();
        collect_named_files(&self.root, &file_name, &mut candidates)?;
        candidates.retain(|path| artifact_names_contract(path, name));
        candidates.sort();

        match candidates.len() {
            0 => Err(ScriptError::ArtifactNotFound(format!(
                "no artifact for contract `{name}` under {}",
                self.root.display()
            ))),
            1 => Ok(candidates.remove(0)),
            _ => {
                let listed = candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ScriptError::ArtifactNotFound(format!(
                    "multiple artifacts for contract `{name}` ({listed}), use a fully qualified name"
                )))
            }
        }
    }
}

/// Recursively collect the files under `dir` named `file_name`
fn collect_named_files(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| ScriptError::ArtifactNotFound(e.to_string()))?;
    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactNotFound(e.to_string()))?
            .path();

        if path.is_dir() {
            if !path.ends_with(BUILD_INFO_DIR) {
                collect_named_files(&path, file_name, found)?;
            }
        } else if path.file_name().is_some_and(|f| f == file_name) {
            found.push(path);
        }
    }

    Ok(())
}

/// Whether the artifact at `path` describes the contract `name`.
///
/// Files that fail to parse are kept, so that `read_artifact` reports why.
fn artifact_names_contract(path: &Path, name: &str) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return true;
    };
    match serde_json::from_str::<ArtifactFile>(&contents) {
        Ok(ArtifactFile { contract_name: Some(contract_name), .. }) => contract_name == name,
        _ => true,
    }
}

/// Read and validate the artifact file at `path`
fn read_artifact(path: &Path, contract_name: &str) -> Result<ContractArtifact, ScriptError> {
    let contents =
        fs::read_to_string(path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    let artifact: ArtifactFile = serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

    if let Some(found) = artifact.contract_name.as_deref().filter(|n| *n != contract_name) {
        return Err(ScriptError::ArtifactNotFound(format!(
            "{} holds contract `{found}`, not `{contract_name}`",
            path.display()
        )));
    }

    let bytecode = hex::decode(artifact.bytecode.hex()).map_err(|e| {
        ScriptError::ArtifactParsing(format!(
            "invalid bytecode for `{contract_name}` (unlinked libraries?): {e}"
        ))
    })?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "`{contract_name}` has no creation bytecode, is it an interface or abstract contract?"
        )));
    }

    Ok(ContractArtifact {
        contract_name: contract_name.to_string(),
        bytecode: bytecode.into(),
    })
}
