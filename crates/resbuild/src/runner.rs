use std::fmt;

use camino::Utf8PathBuf;

use crate::artifact::ArtifactPaths;
use crate::backends::{self, Backend};
use crate::config::{BuildConfig, BuildMode};
use crate::error::BuildError;
use crate::util::fs::copy_artifact;
use crate::util::process::CommandSpec;

/// Ce que `run` ferait, sans rien lancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub mode: BuildMode,
    pub build: CommandSpec,
    pub paths: ArtifactPaths,
    pub optimize: Option<CommandSpec>,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mode:  {}", self.mode.as_str())?;
        writeln!(f, "cwd:   {}", self.build.cwd)?;
        writeln!(f, "build: {}", self.build)?;
        writeln!(f, "copy:  {} -> {}", self.paths.source, self.paths.destination)?;
        if let Some(opt) = &self.optimize {
            writeln!(f, "opt:   {opt}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: BuildMode,
    pub artifact: Utf8PathBuf,
    pub bytes: u64,
    pub optimized: bool,
}

/// Orchestrateur : build → copie dans `res/` → post-traitement optionnel.
/// Chaque étape est vérifiée avant la suivante.
pub struct Runner {
    cfg: BuildConfig,
    backend: Box<dyn Backend>,
}

impl Runner {
    pub fn new(cfg: BuildConfig) -> Self {
        let backend = backends::for_mode(cfg.mode);
        Self { cfg, backend }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.cfg
    }

    pub fn plan(&self) -> Plan {
        let paths = ArtifactPaths::for_config(&self.cfg);
        let optimize = self
            .cfg
            .optimize
            .enabled
            .then(|| self.cfg.optimize.command(&paths.destination, &self.cfg.project_dir));
        Plan { mode: self.cfg.mode, build: self.backend.command(&self.cfg), paths, optimize }
    }

    pub fn run(&self) -> Result<RunReport, BuildError> {
        let paths = ArtifactPaths::for_config(&self.cfg);
        log::info!(
            "build {} ({}) dans {}",
            self.cfg.artifact,
            self.backend.name(),
            self.cfg.project_dir
        );

        let built = self.backend.build(&self.cfg)?;
        log::debug!("artefact produit: {}", built.artifact);

        let mut bytes = copy_artifact(&built.artifact, &paths.destination)?;
        log::info!("copié → {} ({bytes} octets)", paths.destination);

        let optimized = if self.cfg.optimize.enabled {
            self.cfg.optimize.command(&paths.destination, &self.cfg.project_dir).run()?;
            bytes = std::fs::metadata(&paths.destination)
                .map_err(|e| BuildError::io(paths.destination.clone(), e))?
                .len();
            log::info!("optimisé → {bytes} octets");
            true
        } else {
            false
        };

        Ok(RunReport { mode: self.cfg.mode, artifact: paths.destination, bytes, optimized })
    }
}
