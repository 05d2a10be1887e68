//! resbuild-cli/src/lib.rs — CLI lib pour resbuild
//!
//! `resbuild [true]` remplace le `build.sh` d'un contrat :
//!   - sans argument (ou autre que `true`) :
//!     `cargo build --target wasm32-unknown-unknown --release`
//!   - `true` : même build via le wrapper coverage `cargo wasmcov build`
//! puis copie du `.wasm` dans `res/` du projet.

use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser};
use resbuild::{BuildConfig, BuildError, BuildMode, Env, Overrides, Runner};

/// Point d’entrée du binaire (à appeler depuis src/main.rs)
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let cwd = std::env::current_dir().context("répertoire courant illisible")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow!("répertoire courant non UTF-8: {}", p.display()))?;
    execute(&cli, &cwd, &Env::from_process())
}

#[derive(Parser, Debug)]
#[command(
    name = "resbuild",
    version,
    about = "Build un contrat WebAssembly et copie l'artefact dans res/"
)]
pub struct Cli {
    /// `true` : build instrumenté coverage (cargo wasmcov). Toute autre valeur : build standard
    #[arg(allow_negative_numbers = true)]
    pub coverage: Option<String>,

    /// Arguments en trop après le jeton coverage : ignorés, comme `build.sh`
    #[arg(hide = true, allow_negative_numbers = true)]
    pub ignored: Vec<String>,

    /// Dossier du contrat (défaut : premier ancêtre du cwd contenant un Cargo.toml)
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<Utf8PathBuf>,

    /// Manifest resbuild (défaut : <projet>/resbuild.toml s'il existe)
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Fichier de flags partagé (KEY=VALUE), exporté vers cargo
    #[arg(long, value_name = "FILE")]
    pub flags_file: Option<Utf8PathBuf>,

    /// Nom de l'artefact (défaut : déduit du Cargo.toml)
    #[arg(long, value_name = "NAME")]
    pub artifact: Option<String>,

    /// Target triple
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// Dossier de travail du wrapper coverage
    #[arg(long, value_name = "DIR")]
    pub coverage_dir: Option<Utf8PathBuf>,

    /// Passe l'artefact copié dans wasm-opt
    #[arg(long, overrides_with = "no_optimize")]
    pub optimize: bool,

    /// Désactive wasm-opt même si resbuild.toml l'active
    #[arg(long, overrides_with = "optimize")]
    pub no_optimize: bool,

    /// Affiche les commandes sans rien lancer
    #[arg(long)]
    pub dry_run: bool,

    /// Verbosité (répéter pour plus de bruit)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn mode(&self) -> BuildMode {
        BuildMode::from_flag(self.coverage.as_deref())
    }

    pub fn overrides(&self) -> Overrides {
        let optimize = if self.optimize {
            Some(true)
        } else if self.no_optimize {
            Some(false)
        } else {
            None
        };
        Overrides {
            mode: self.mode(),
            manifest: self.manifest.clone(),
            flags_file: self.flags_file.clone(),
            artifact: self.artifact.clone(),
            target: self.target.clone(),
            cargo_bin: None,
            coverage_dir: self.coverage_dir.clone(),
            optimize,
        }
    }
}

/// Exécute la CLI déjà parsée. `cwd` ne sert qu'à trouver le projet.
pub fn execute(cli: &Cli, cwd: &Utf8Path, env: &Env) -> Result<()> {
    if !cli.ignored.is_empty() {
        log::debug!("arguments ignorés: {:?}", cli.ignored);
    }
    let project = resbuild::project_dir(cli.project_dir.as_deref(), cwd)?;
    let cfg = BuildConfig::resolve(&project, &cli.overrides(), env)
        .with_context(|| format!("configuration de {project}"))?;
    let runner = Runner::new(cfg);

    if cli.dry_run {
        print!("{}", runner.plan());
        return Ok(());
    }

    let report = runner.run()?;
    let opt = if report.optimized { ", optimisé" } else { "" };
    eprintln!("✅ {} ({} octets{opt})", report.artifact, report.bytes);
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("RESBUILD_LOG", default))
        .format_target(false)
        .init();
}

/// Code de sortie : celui de l'outil externe en échec, sinon 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<BuildError>().map_or(1, BuildError::exit_code)
}

/// Affiche l'erreur, sauf quand un outil externe a déjà parlé.
pub fn report(err: &anyhow::Error) {
    if let Some(e @ BuildError::CommandFailed { .. }) = err.downcast_ref::<BuildError>() {
        log::debug!("{e}");
    } else {
        eprintln!("✖ {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn coverage_token() {
        let cli = Cli::try_parse_from(["resbuild"]).unwrap();
        assert_eq!(cli.mode(), BuildMode::Standard);

        let cli = Cli::try_parse_from(["resbuild", "true"]).unwrap();
        assert_eq!(cli.mode(), BuildMode::Coverage);

        for other in ["false", "", "garbage"] {
            let cli = Cli::try_parse_from(["resbuild", other]).unwrap();
            assert_eq!(cli.mode(), BuildMode::Standard, "{other:?}");
        }
    }

    #[test]
    fn odd_tokens_still_build() {
        let cli = Cli::try_parse_from(["resbuild", "-1"]).unwrap();
        assert_eq!(cli.mode(), BuildMode::Standard);

        let cli = Cli::try_parse_from(["resbuild", "true", "extra", "-2"]).unwrap();
        assert_eq!(cli.mode(), BuildMode::Coverage);
        assert_eq!(cli.ignored, ["extra", "-2"]);

        let cli = Cli::try_parse_from(["resbuild", "-v", "true", "extra", "--dry-run"]).unwrap();
        assert_eq!(cli.mode(), BuildMode::Coverage);
        assert_eq!(cli.verbose, 1);
        assert!(cli.dry_run);
    }

    #[test]
    fn optimize_flags() {
        let cli = Cli::try_parse_from(["resbuild"]).unwrap();
        assert_eq!(cli.overrides().optimize, None);
        let cli = Cli::try_parse_from(["resbuild", "--optimize"]).unwrap();
        assert_eq!(cli.overrides().optimize, Some(true));
        let cli = Cli::try_parse_from(["resbuild", "--no-optimize"]).unwrap();
        assert_eq!(cli.overrides().optimize, Some(false));
    }

    #[test]
    fn exit_code_survives_context() {
        let e = anyhow::Error::new(BuildError::CommandFailed {
            program: "cargo build".into(),
            code: Some(101),
        })
        .context("build du contrat");
        assert_eq!(exit_code(&e), 101);
        assert_eq!(exit_code(&anyhow!("autre chose")), 1);
    }
}
