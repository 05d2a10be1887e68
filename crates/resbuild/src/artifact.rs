use camino::Utf8PathBuf;

use crate::config::{BuildConfig, BuildMode, PROFILE};

/// Où l'outil de build dépose l'artefact, et où on le recopie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub source: Utf8PathBuf,
    pub destination: Utf8PathBuf,
}

/// Dossier `target` de l'outil de build : celui de cargo, ou celui que le
/// wrapper coverage tient sous son dossier de travail.
pub fn target_root(cfg: &BuildConfig) -> Utf8PathBuf {
    match cfg.mode {
        BuildMode::Standard => cfg.target_dir.clone(),
        BuildMode::Coverage => cfg.coverage_dir.join("target"),
    }
}

impl ArtifactPaths {
    pub fn for_config(cfg: &BuildConfig) -> Self {
        Self {
            source: target_root(cfg).join(&cfg.target).join(PROFILE).join(&cfg.artifact),
            destination: cfg.res_dir.join(&cfg.artifact),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TARGET;
    use crate::optimize::OptimizeConfig;

    fn cfg(mode: BuildMode) -> BuildConfig {
        BuildConfig {
            mode,
            project_dir: "/w/contracts/ft".into(),
            target_dir: "/w/target".into(),
            target: DEFAULT_TARGET.into(),
            artifact: "ft.wasm".into(),
            res_dir: "/w/contracts/ft/res".into(),
            cargo_bin: "cargo".into(),
            coverage_dir: "/w/wasmcov".into(),
            flags_file: None,
            extra_env: Vec::new(),
            optimize: OptimizeConfig::default(),
        }
    }

    #[test]
    fn standard_reads_from_target_dir() {
        let p = ArtifactPaths::for_config(&cfg(BuildMode::Standard));
        assert_eq!(p.source, "/w/target/wasm32-unknown-unknown/release/ft.wasm");
        assert_eq!(p.destination, "/w/contracts/ft/res/ft.wasm");
    }

    #[test]
    fn coverage_reads_from_wrapper_dir() {
        let p = ArtifactPaths::for_config(&cfg(BuildMode::Coverage));
        assert_eq!(p.source, "/w/wasmcov/target/wasm32-unknown-unknown/release/ft.wasm");
        assert_eq!(p.destination, "/w/contracts/ft/res/ft.wasm");
    }
}
