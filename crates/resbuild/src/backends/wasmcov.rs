use crate::config::BuildConfig;
use crate::util::process::CommandSpec;

use super::{base_env, cargo_build_args, Backend};

/// Répertoire de travail du wrapper coverage.
pub const ENV_WASMCOV_DIR: &str = "WASMCOV_DIR";

/// `cargo wasmcov build --target <triple> --release`.
///
/// Le wrapper instrumente le build et dépose tout sous `WASMCOV_DIR`
/// (l'artefact dans `$WASMCOV_DIR/target/<triple>/release/`). `CARGO_TARGET_DIR`
/// pointe au même endroit pour qu'un `target` hérité ne l'en détourne pas.
#[derive(Debug, Clone, Copy, Default)]
pub struct WasmcovBackend;

impl Backend for WasmcovBackend {
    fn name(&self) -> &'static str {
        "wasmcov"
    }

    fn command(&self, cfg: &BuildConfig) -> CommandSpec {
        CommandSpec::new(&cfg.cargo_bin, &cfg.project_dir)
            .args(["wasmcov", "build"])
            .args(cargo_build_args(cfg))
            .envs(base_env(cfg))
            .env(ENV_WASMCOV_DIR, cfg.coverage_dir.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildMode, DEFAULT_TARGET};
    use crate::optimize::OptimizeConfig;

    #[test]
    fn command_line() {
        let cfg = BuildConfig {
            mode: BuildMode::Coverage,
            project_dir: "/w/ft".into(),
            target_dir: "/w/target".into(),
            target: DEFAULT_TARGET.into(),
            artifact: "ft.wasm".into(),
            res_dir: "/w/ft/res".into(),
            cargo_bin: "cargo".into(),
            coverage_dir: "/w/wasmcov".into(),
            flags_file: None,
            extra_env: Vec::new(),
            optimize: OptimizeConfig::default(),
        };
        let spec = WasmcovBackend.command(&cfg);
        assert_eq!(
            spec.to_string(),
            "CARGO_TARGET_DIR=/w/wasmcov/target WASMCOV_DIR=/w/wasmcov \
             cargo wasmcov build --target wasm32-unknown-unknown --release"
        );
    }
}
