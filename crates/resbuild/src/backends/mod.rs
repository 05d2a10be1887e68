//! Backends de build : qui appeler pour produire le `.wasm`.

pub mod cargo;
pub mod wasmcov;

use camino::Utf8PathBuf;

use crate::artifact::{target_root, ArtifactPaths};
use crate::config::{BuildConfig, BuildMode, ENV_TARGET_DIR};
use crate::error::BuildError;
use crate::util::process::CommandSpec;

pub use self::cargo::CargoBackend;
pub use self::wasmcov::WasmcovBackend;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Artefact tel que produit par l'outil (avant copie dans `res/`).
    pub artifact: Utf8PathBuf,
}

pub trait Backend {
    fn name(&self) -> &'static str;

    /// Commande à lancer pour cette configuration.
    fn command(&self, cfg: &BuildConfig) -> CommandSpec;

    /// Lance le build puis vérifie que l'artefact attendu existe.
    fn build(&self, cfg: &BuildConfig) -> Result<BuildResult, BuildError> {
        self.command(cfg).run()?;
        let artifact = ArtifactPaths::for_config(cfg).source;
        if !artifact.is_file() {
            return Err(BuildError::ArtifactMissing(artifact));
        }
        Ok(BuildResult { artifact })
    }
}

pub fn for_mode(mode: BuildMode) -> Box<dyn Backend> {
    match mode {
        BuildMode::Standard => Box::new(CargoBackend),
        BuildMode::Coverage => Box::new(WasmcovBackend),
    }
}

/// Arguments passés tels quels à cargo, dans les deux modes.
pub(crate) fn cargo_build_args(cfg: &BuildConfig) -> [String; 3] {
    ["--target".to_string(), cfg.target.clone(), "--release".to_string()]
}

/// Environnement commun : variables du fichier de flags, puis le dossier
/// `target` où l'artefact sera cherché (cargo le relit depuis `CARGO_TARGET_DIR`).
pub(crate) fn base_env(cfg: &BuildConfig) -> Vec<(String, String)> {
    let mut env: Vec<(String, String)> =
        cfg.extra_env.iter().filter(|(k, _)| k != ENV_TARGET_DIR).cloned().collect();
    env.push((ENV_TARGET_DIR.to_string(), target_root(cfg).to_string()));
    env
}
