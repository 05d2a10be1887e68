//! resbuild — build runner pour contrats WebAssembly.
//! - Résout la configuration (défauts → resbuild.toml → env → flags partagés → CLI)
//! - Lance `cargo build` ou le wrapper coverage `cargo wasmcov build`
//! - Copie l'artefact `.wasm` produit dans `res/` du projet
//!
//! Fail-fast : la première étape en échec arrête tout, l'erreur remonte telle quelle.

pub mod artifact;
pub mod backends;
pub mod config;
pub mod error;
pub mod flags;
pub mod manifest;
pub mod optimize;
pub mod runner;
mod util;

pub use artifact::ArtifactPaths;
pub use backends::{Backend, BuildResult};
pub use config::{project_dir, BuildConfig, BuildMode, Env, Overrides};
pub use error::BuildError;
pub use flags::FlagsFile;
pub use optimize::OptimizeConfig;
pub use runner::{Plan, RunReport, Runner};
pub use util::fs::copy_artifact;
pub use util::process::CommandSpec;
