//! Lecture des manifests TOML : `resbuild.toml` (optionnel) et le `Cargo.toml`
//! du contrat (pour deviner le nom de l'artefact).

use std::fs;
use std::io;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::BuildError;

pub const MANIFEST_FILE: &str = "resbuild.toml";

/// `resbuild.toml` : surcharges par projet, toutes optionnelles.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub artifact: Option<String>,
    pub target: Option<String>,
    pub res_dir: Option<String>,
    pub flags_file: Option<String>,
    pub coverage_dir: Option<String>,
    #[serde(default)]
    pub optimize: Option<OptimizeSection>,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OptimizeSection {
    #[serde(default)]
    pub enabled: bool,
    pub tool: Option<String>,
    pub args: Option<Vec<String>>,
}

impl ProjectManifest {
    pub fn load(path: &Utf8Path) -> Result<Self, BuildError> {
        let s = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        toml::from_str(&s)
            .map_err(|source| BuildError::Manifest { path: path.to_path_buf(), source })
    }

    /// Comme `load`, mais un fichier absent donne les défauts.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, BuildError> {
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s)
                .map_err(|source| BuildError::Manifest { path: path.to_path_buf(), source }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(BuildError::io(path, e)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
    lib: Option<CargoLib>,
}

#[derive(Debug, Deserialize)]
struct CargoPackage {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CargoLib {
    name: Option<String>,
}

/// Nom du `.wasm` que cargo produit pour un `cdylib` : `[lib] name` s'il
/// existe, sinon `[package] name`, `-` remplacés par `_`.
pub fn artifact_from_cargo(cargo_toml: &Utf8Path) -> Result<String, BuildError> {
    let s = fs::read_to_string(cargo_toml).map_err(|e| BuildError::io(cargo_toml, e))?;
    let m: CargoManifest = toml::from_str(&s)
        .map_err(|source| BuildError::Manifest { path: cargo_toml.to_path_buf(), source })?;
    let name = m
        .lib
        .and_then(|lib| lib.name)
        .or_else(|| m.package.map(|pkg| pkg.name))
        .ok_or_else(|| BuildError::NoArtifactName { path: cargo_toml.to_path_buf() })?;
    Ok(format!("{}.wasm", name.replace('-', "_")))
}
