//! Fichier de flags partagé entre contrats (ex-`source ../flags.sh`).
//!
//! Format accepté : sous-ensemble du shell POSIX.
//! ```text
//! # commentaire
//! RUSTFLAGS='-C link-arg=-s'
//! export CARGO_PROFILE_RELEASE_LTO=true
//! NEAR_ENV="testnet"   # commentaire de fin de ligne
//! ```
//! Pas d'expansion de variables ni de substitution de commande : `$X` reste littéral.

use std::fs;

use camino::Utf8Path;

use crate::error::BuildError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagsFile {
    vars: Vec<(String, String)>,
}

impl FlagsFile {
    pub fn load(path: &Utf8Path) -> Result<Self, BuildError> {
        let text = fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
        Self::parse(&text).map_err(|(line, message)| BuildError::FlagsFile {
            path: path.to_path_buf(),
            line,
            message,
        })
    }

    /// Parse le texte; en cas d'erreur renvoie (ligne 1-based, message).
    pub fn parse(text: &str) -> Result<Self, (usize, String)> {
        let mut vars: Vec<(String, String)> = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").map_or(line, str::trim_start);
            let (key, rest) = line.split_once('=').ok_or_else(|| {
                (idx + 1, format!("affectation attendue (KEY=VALUE), trouvé `{line}`"))
            })?;
            if !is_identifier(key) {
                return Err((idx + 1, format!("nom de variable invalide `{key}`")));
            }
            let value = parse_value(rest).map_err(|m| (idx + 1, m))?;
            // La dernière affectation gagne, comme dans un shell.
            vars.retain(|(k, _)| k != key);
            vars.push((key.to_string(), value));
        }
        Ok(Self { vars })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn vars(&self) -> &[(String, String)] {
        &self.vars
    }

    pub fn into_vars(self) -> Vec<(String, String)> {
        self.vars
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn parse_value(rest: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' => loop {
                match chars.next() {
                    Some('\'') => break,
                    Some(ch) => out.push(ch),
                    None => return Err("apostrophe non fermée".into()),
                }
            },
            '"' => loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(ch @ ('"' | '\\' | '$' | '`')) => out.push(ch),
                        Some(ch) => {
                            out.push('\\');
                            out.push(ch);
                        }
                        None => return Err("guillemet non fermé".into()),
                    },
                    Some(ch) => out.push(ch),
                    None => return Err("guillemet non fermé".into()),
                }
            },
            '\\' => match chars.next() {
                Some(ch) => out.push(ch),
                None => return Err("`\\` en fin de ligne non supporté".into()),
            },
            c if c.is_whitespace() => {
                // Fin de la valeur : seul un commentaire peut suivre.
                let tail: String = chars.collect();
                let tail = tail.trim_start();
                if tail.is_empty() || tail.starts_with('#') {
                    return Ok(out);
                }
                return Err(format!("contenu inattendu après la valeur: `{tail}`"));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_usual_flags_file() {
        let f = FlagsFile::parse(
            "#!/bin/sh\n\
             # flags partagés\n\
             RUSTFLAGS='-C link-arg=-s'\n\
             \n\
             export CARGO_PROFILE_RELEASE_LTO=true\n\
             NEAR_ENV=\"test net\"  # fin\n",
        )
        .unwrap();
        assert_eq!(
            f.vars(),
            &[
                ("RUSTFLAGS".to_string(), "-C link-arg=-s".to_string()),
                ("CARGO_PROFILE_RELEASE_LTO".to_string(), "true".to_string()),
                ("NEAR_ENV".to_string(), "test net".to_string()),
            ]
        );
    }

    #[test]
    fn last_assignment_wins() {
        let f = FlagsFile::parse("A=1\nB=2\nA=3\n").unwrap();
        assert_eq!(f.get("A"), Some("3"));
        assert_eq!(f.vars().len(), 2);
    }

    #[test]
    fn empty_value_and_escapes() {
        let f = FlagsFile::parse("EMPTY=\nQ=\"a\\\"b\\n\"\nRAW=a\\ b\n").unwrap();
        assert_eq!(f.get("EMPTY"), Some(""));
        assert_eq!(f.get("Q"), Some("a\"b\\n"));
        assert_eq!(f.get("RAW"), Some("a b"));
    }

    #[test]
    fn variables_are_not_expanded() {
        let f = FlagsFile::parse("X='$HOME'\nY=$HOME/bin\n").unwrap();
        assert_eq!(f.get("X"), Some("$HOME"));
        assert_eq!(f.get("Y"), Some("$HOME/bin"));
    }

    #[test]
    fn errors_carry_line_numbers() {
        assert_eq!(FlagsFile::parse("A=1\nnot an assignment\n").unwrap_err().0, 2);
        assert_eq!(FlagsFile::parse("\n\n1BAD=x\n").unwrap_err().0, 3);
        assert_eq!(FlagsFile::parse("A='open\n").unwrap_err().0, 1);
        assert_eq!(FlagsFile::parse("A=one two\n").unwrap_err().0, 1);
    }

    #[test]
    fn load_reports_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8Path::from_path(dir.path()).unwrap().join("flags.sh");
        std::fs::write(&path, "OK=1\noops\n").unwrap();
        match FlagsFile::load(&path).unwrap_err() {
            BuildError::FlagsFile { path: p, line, .. } => {
                assert_eq!(p, path);
                assert_eq!(line, 2);
            }
            other => panic!("erreur inattendue: {other:?}"),
        }
    }
}
