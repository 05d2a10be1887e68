use std::fs;
use std::path::Path;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

use crate::error::BuildError;

pub fn ensure_parent(p: &Utf8Path) -> Result<(), BuildError> {
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
    }
    Ok(())
}

/// Copie `src` vers `dst` (écrase), en créant le dossier parent au besoin.
/// Retourne la taille de l'artefact.
///
/// Si `dst` est déjà `src` (même fichier une fois canonisé), rien n'est copié :
/// `fs::copy` tronquerait l'artefact.
pub fn copy_artifact(src: &Utf8Path, dst: &Utf8Path) -> Result<u64, BuildError> {
    let len = fs::metadata(src).map_err(|e| BuildError::io(src, e))?.len();
    ensure_parent(dst)?;
    if same_file(src, dst) {
        log::debug!("{dst} est déjà l'artefact, copie ignorée");
        return Ok(len);
    }
    fs::copy(src, dst).map_err(|e| BuildError::io(dst, e))
}

fn same_file(a: &Utf8Path, b: &Utf8Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `p` si absolu, sinon `base/p`, nettoyé lexicalement.
pub fn resolve_against(base: &Utf8Path, p: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    let p = p.as_ref();
    if p.is_absolute() {
        normalize(p)
    } else {
        normalize(&base.join(p))
    }
}

/// Nettoyage lexical (`.` et `..`), sans toucher au disque.
pub fn normalize(p: &Utf8Path) -> Utf8PathBuf {
    let mut out = Utf8PathBuf::new();
    for comp in p.components() {
        match comp {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Utf8Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_str()),
        }
    }
    out
}

pub fn to_utf8(p: &Path) -> Result<Utf8PathBuf, BuildError> {
    Utf8PathBuf::from_path_buf(p.to_path_buf()).map_err(BuildError::NonUtf8Path)
}
