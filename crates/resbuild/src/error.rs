use std::io;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Erreurs du build runner. Toutes sont fatales.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Un outil externe (cargo, wasmcov, wasm-opt) a rendu un statut non nul.
    #[error("`{program}` a échoué ({})", describe_code(*.code))]
    CommandFailed { program: String, code: Option<i32> },

    #[error("impossible de lancer `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("artefact introuvable après le build: {0}")]
    ArtifactMissing(Utf8PathBuf),

    #[error("E/S sur {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TOML invalide dans {path}")]
    Manifest {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{path}: pas de [package] name, précise l'artefact explicitement")]
    NoArtifactName { path: Utf8PathBuf },

    #[error("{path}:{line}: {message}")]
    FlagsFile {
        path: Utf8PathBuf,
        line: usize,
        message: String,
    },

    #[error("chemin non UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("aucun Cargo.toml trouvé depuis {0}")]
    ProjectNotFound(Utf8PathBuf),
}

impl BuildError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Code de sortie à propager au shell appelant.
    ///
    /// Un outil externe en échec transmet son propre code; tout le reste
    /// (E/S, config, processus tué par un signal) sort en 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::CommandFailed { code: Some(code), .. } => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit {c}"),
        None => "tué par un signal".to_string(),
    }
}
