//! Résolution de la configuration de build.
//!
//! Précédence, du plus faible au plus fort :
//! 1. défauts intégrés
//! 2. `resbuild.toml` du projet
//! 3. variables d'environnement
//! 4. fichier de flags partagé (ses variables écrasent l'environnement, comme `source`)
//! 5. ligne de commande

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::BuildError;
use crate::flags::FlagsFile;
use crate::manifest::{self, ProjectManifest};
use crate::optimize::OptimizeConfig;
use crate::util::fs::{resolve_against, to_utf8};

pub const DEFAULT_TARGET: &str = "wasm32-unknown-unknown";
pub const DEFAULT_TARGET_DIR: &str = "target";
pub const DEFAULT_RES_DIR: &str = "res";
pub const DEFAULT_COVERAGE_DIR: &str = "../wasmcov";
pub const DEFAULT_CARGO: &str = "cargo";
pub const PROFILE: &str = "release";

pub const ENV_TARGET_DIR: &str = "CARGO_TARGET_DIR";
pub const ENV_CARGO: &str = "CARGO";
pub const ENV_COVERAGE_DIR: &str = "RESBUILD_COVERAGE_DIR";
pub const ENV_FLAGS_FILE: &str = "RESBUILD_FLAGS_FILE";

/// Mode de build : cargo direct ou wrapper coverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    #[default]
    Standard,
    Coverage,
}

impl BuildMode {
    /// Seul le jeton littéral `true` active la coverage.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("true") => Self::Coverage,
            _ => Self::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Coverage => "coverage",
        }
    }
}

/// Instantané de l'environnement. Les variables non UTF-8 sont ignorées.
#[derive(Debug, Clone, Default)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn overlay<'a>(&mut self, pairs: impl IntoIterator<Item = &'a (String, String)>) {
        for (k, v) in pairs {
            self.vars.insert(k.clone(), v.clone());
        }
    }
}

/// Surcharges venant de la ligne de commande.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: BuildMode,
    pub manifest: Option<Utf8PathBuf>,
    pub flags_file: Option<Utf8PathBuf>,
    pub artifact: Option<String>,
    pub target: Option<String>,
    pub cargo_bin: Option<String>,
    pub coverage_dir: Option<Utf8PathBuf>,
    pub optimize: Option<bool>,
}

/// Configuration résolue. Tous les chemins sont absolus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub mode: BuildMode,
    pub project_dir: Utf8PathBuf,
    pub target_dir: Utf8PathBuf,
    pub target: String,
    pub artifact: String,
    pub res_dir: Utf8PathBuf,
    pub cargo_bin: String,
    pub coverage_dir: Utf8PathBuf,
    pub flags_file: Option<Utf8PathBuf>,
    /// Variables du fichier de flags, exportées vers les outils lancés.
    pub extra_env: Vec<(String, String)>,
    pub optimize: OptimizeConfig,
}

impl BuildConfig {
    /// `project_dir` doit être absolu : rien ici ne dépend du répertoire courant.
    pub fn resolve(
        project_dir: &Utf8Path,
        overrides: &Overrides,
        env: &Env,
    ) -> Result<Self, BuildError> {
        let project_dir = project_dir.to_path_buf();
        debug_assert!(project_dir.is_absolute(), "project_dir doit être absolu");

        // 2) resbuild.toml (obligatoire seulement s'il est demandé explicitement)
        let manifest = match &overrides.manifest {
            Some(p) => ProjectManifest::load(&resolve_against(&project_dir, p))?,
            None => ProjectManifest::load_or_default(&project_dir.join(manifest::MANIFEST_FILE))?,
        };

        // 3) + 4) environnement, puis fichier de flags par-dessus
        let flags_file = overrides
            .flags_file
            .clone()
            .or_else(|| env.get(ENV_FLAGS_FILE).map(Utf8PathBuf::from))
            .or_else(|| manifest.flags_file.as_deref().map(Utf8PathBuf::from))
            .map(|p| resolve_against(&project_dir, p));
        let extra_env = match &flags_file {
            Some(p) => {
                log::debug!("flags partagés: {p}");
                FlagsFile::load(p)?.into_vars()
            }
            None => Vec::new(),
        };
        let mut env = env.clone();
        env.overlay(&extra_env);

        let target_dir =
            resolve_against(&project_dir, env.get(ENV_TARGET_DIR).unwrap_or(DEFAULT_TARGET_DIR));
        let coverage_dir = overrides
            .coverage_dir
            .clone()
            .or_else(|| env.get(ENV_COVERAGE_DIR).map(Utf8PathBuf::from))
            .or_else(|| manifest.coverage_dir.as_deref().map(Utf8PathBuf::from))
            .map_or_else(
                || resolve_against(&project_dir, DEFAULT_COVERAGE_DIR),
                |p| resolve_against(&project_dir, p),
            );
        let cargo_bin = overrides
            .cargo_bin
            .clone()
            .or_else(|| env.get(ENV_CARGO).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_CARGO.to_string());

        // 5) cible et artefact : CLI, puis resbuild.toml, puis Cargo.toml
        let target = overrides
            .target
            .clone()
            .or(manifest.target)
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());
        let artifact = match overrides.artifact.clone().or(manifest.artifact) {
            Some(a) => a,
            None => manifest::artifact_from_cargo(&project_dir.join("Cargo.toml"))?,
        };
        let res_dir =
            resolve_against(&project_dir, manifest.res_dir.as_deref().unwrap_or(DEFAULT_RES_DIR));
        let mut optimize = OptimizeConfig::from_section(manifest.optimize.as_ref());
        if let Some(on) = overrides.optimize {
            optimize.enabled = on;
        }

        Ok(Self {
            mode: overrides.mode,
            project_dir,
            target_dir,
            target,
            artifact,
            res_dir,
            cargo_bin,
            coverage_dir,
            flags_file,
            extra_env,
            optimize,
        })
    }
}

/// Dossier du projet (l'ancien "dossier du script"), absolu et canonique.
///
/// Explicite : relatif à `cwd`. Sinon : premier ancêtre de `cwd` qui contient
/// un `Cargo.toml`, comme cargo.
pub fn project_dir(explicit: Option<&Utf8Path>, cwd: &Utf8Path) -> Result<Utf8PathBuf, BuildError> {
    let dir = match explicit {
        Some(p) => resolve_against(cwd, p),
        None => cwd
            .ancestors()
            .find(|d| d.join("Cargo.toml").is_file())
            .map(Utf8Path::to_path_buf)
            .ok_or_else(|| BuildError::ProjectNotFound(cwd.to_path_buf()))?,
    };
    let canonical = dir.canonicalize().map_err(|e| BuildError::io(dir.clone(), e))?;
    to_utf8(&canonical)
}
