//! Post-traitement optionnel de l'artefact copié (réduction de taille).
//! Désactivé par défaut : les anciens scripts le gardaient en commentaire.

use camino::Utf8Path;

use crate::manifest::OptimizeSection;
use crate::util::process::CommandSpec;

pub const DEFAULT_TOOL: &str = "wasm-opt";
pub const DEFAULT_ARGS: &[&str] = &["-Oz"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizeConfig {
    pub enabled: bool,
    pub tool: String,
    pub args: Vec<String>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            tool: DEFAULT_TOOL.to_string(),
            args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl OptimizeConfig {
    pub(crate) fn from_section(section: Option<&OptimizeSection>) -> Self {
        let mut cfg = Self::default();
        if let Some(s) = section {
            cfg.enabled = s.enabled;
            if let Some(tool) = &s.tool {
                cfg.tool.clone_from(tool);
            }
            if let Some(args) = &s.args {
                cfg.args.clone_from(args);
            }
        }
        cfg
    }

    /// `<tool> <args...> <artifact> -o <artifact>` (réécriture sur place).
    pub fn command(&self, artifact: &Utf8Path, cwd: &Utf8Path) -> CommandSpec {
        CommandSpec::new(&self.tool, cwd)
            .args(self.args.iter().cloned())
            .args([artifact.as_str(), "-o", artifact.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_unless_asked() {
        assert!(!OptimizeConfig::default().enabled);
        assert!(!OptimizeConfig::from_section(None).enabled);
    }

    #[test]
    fn section_overrides_tool_and_args() {
        let s = OptimizeSection {
            enabled: true,
            tool: Some("/opt/binaryen/wasm-opt".into()),
            args: None,
        };
        let cfg = OptimizeConfig::from_section(Some(&s));
        assert!(cfg.enabled);
        assert_eq!(cfg.tool, "/opt/binaryen/wasm-opt");
        assert_eq!(cfg.args, vec!["-Oz".to_string()]);
    }

    #[test]
    fn rewrites_in_place() {
        let cfg = OptimizeConfig::default();
        let spec = cfg.command(Utf8Path::new("/p/res/a.wasm"), Utf8Path::new("/p"));
        assert_eq!(spec.to_string(), "wasm-opt -Oz /p/res/a.wasm -o /p/res/a.wasm");
    }
}
