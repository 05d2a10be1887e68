use crate::config::BuildConfig;
use crate::util::process::CommandSpec;

use super::{base_env, cargo_build_args, Backend};

/// `cargo build --target <triple> --release`, lancé dans le dossier du projet.
#[derive(Debug, Clone, Copy, Default)]
pub struct CargoBackend;

impl Backend for CargoBackend {
    fn name(&self) -> &'static str {
        "cargo"
    }

    fn command(&self, cfg: &BuildConfig) -> CommandSpec {
        CommandSpec::new(&cfg.cargo_bin, &cfg.project_dir)
            .args(["build"])
            .args(cargo_build_args(cfg))
            .envs(base_env(cfg))
    }
}
