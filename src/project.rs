//! Project and template-source discovery

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{RuledeckError, RuledeckResult};
use crate::fs::expand_home;

/// npm package whose presence marks a template-source project
pub const SERVER_PACKAGE: &str = "@modelcontextprotocol/server-filesystem";

/// The project the tool is working on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDir {
    /// Final path component of `root`
    pub name: String,
    pub root: PathBuf,
}

impl ProjectDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { name, root }
    }

    /// Where this project's rule files live
    pub fn rules_dir(&self, rules: &RulesConfig) -> PathBuf {
        self.root.join(&rules.dir)
    }
}

/// Find the project `cwd` belongs to.
///
/// Walks upward from `cwd` (inclusive) and stops at the first directory
/// holding a `.cursor` or `.git` marker. Only directories strictly below
/// `home` qualify for the marker check, since `~/.cursor` is the IDE's own
/// settings folder. Without a marker, `cwd` itself is the project as long
/// as it lies under `home`.
pub fn find_project_dir(cwd: &Path, home: &Path) -> RuledeckResult<ProjectDir> {
    if !cwd.starts_with(home) {
        return Err(RuledeckError::NoProjectDir {
            cwd: cwd.to_path_buf(),
            home: home.to_path_buf(),
        });
    }

    let marked = cwd
        .ancestors()
        .take_while(|dir| *dir != home && dir.starts_with(home))
        .find(|dir| dir.join(".cursor").is_dir() || dir.join(".git").exists());

    Ok(ProjectDir::new(marked.unwrap_or(cwd)))
}

/// Where the template rules came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateOrigin {
    /// `--templates` on the command line
    Flag,
    /// `rules.templates` in a config file or `RULEDECK_TEMPLATES`
    Config,
    /// An ancestor project depending on the filesystem server package
    Discovered,
}

/// Directory of template rule files copied into new projects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSource {
    pub rules_dir: PathBuf,
    /// The project that owns the templates, when discovered
    pub project: Option<PathBuf>,
    pub origin: TemplateOrigin,
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: serde_json::Map<String, serde_json::Value>,
}

/// Whether `dir/package.json` depends on the filesystem server package.
/// Unreadable or malformed manifests count as "no".
pub fn is_template_project(dir: &Path) -> bool {
    let Ok(content) = fs::read_to_string(dir.join("package.json")) else {
        return false;
    };
    let Ok(manifest) = serde_json::from_str::<PackageJson>(&content) else {
        return false;
    };
    manifest.dependencies.contains_key(SERVER_PACKAGE)
        || manifest.dev_dependencies.contains_key(SERVER_PACKAGE)
}

/// Walk upward from `cwd` (staying under `home`) looking for a template project
pub fn find_template_source(cwd: &Path, home: &Path, rules: &RulesConfig) -> Option<TemplateSource> {
    cwd.ancestors()
        .take_while(|dir| dir.starts_with(home))
        .find(|dir| is_template_project(dir))
        .map(|dir| TemplateSource {
            rules_dir: dir.join(&rules.dir),
            project: Some(dir.to_path_buf()),
            origin: TemplateOrigin::Discovered,
        })
}

/// Resolve the template source: flag, then config/env, then discovery
pub fn resolve_template_source(
    flag: Option<&Path>,
    rules: &RulesConfig,
    cwd: &Path,
    home: &Path,
) -> Option<TemplateSource> {
    if let Some(dir) = flag {
        return Some(TemplateSource {
            rules_dir: expand_home(dir),
            project: None,
            origin: TemplateOrigin::Flag,
        });
    }
    if let Some(dir) = &rules.templates {
        return Some(TemplateSource {
            rules_dir: expand_home(dir),
            project: None,
            origin: TemplateOrigin::Config,
        });
    }
    find_template_source(cwd, home, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn template_manifest(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join("package.json"),
            format!(r#"{{"name":"rules","dependencies":{{"{SERVER_PACKAGE}":"^2025.1.0"}}}}"#),
        )
        .unwrap();
    }

    #[test]
    fn project_dir_is_cwd_without_markers() {
        let home = tempdir().unwrap();
        let cwd = home.path().join("work/webshop");
        fs::create_dir_all(&cwd).unwrap();

        let project = find_project_dir(&cwd, home.path()).unwrap();

        assert_eq!(project.root, cwd);
        assert_eq!(project.name, "webshop");
    }

    #[test]
    fn project_dir_prefers_nearest_marker() {
        let home = tempdir().unwrap();
        let root = home.path().join("work/webshop");
        fs::create_dir_all(root.join(".git")).unwrap();
        let cwd = root.join("src/api");
        fs::create_dir_all(&cwd).unwrap();

        assert_eq!(find_project_dir(&cwd, home.path()).unwrap().root, root);

        fs::create_dir_all(root.join("src/.cursor")).unwrap();
        assert_eq!(
            find_project_dir(&cwd, home.path()).unwrap().root,
            root.join("src")
        );
    }

    #[test]
    fn home_cursor_folder_is_not_a_project_marker() {
        let home = tempdir().unwrap();
        fs::create_dir_all(home.path().join(".cursor")).unwrap();
        let cwd = home.path().join("scratch");
        fs::create_dir_all(&cwd).unwrap();

        assert_eq!(find_project_dir(&cwd, home.path()).unwrap().root, cwd);
    }

    #[test]
    fn outside_home_is_an_error() {
        let home = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();

        let err = find_project_dir(elsewhere.path(), home.path()).unwrap_err();
        assert!(matches!(err, RuledeckError::NoProjectDir { .. }));
    }

    #[test]
    fn rules_dir_follows_config() {
        let project = ProjectDir::new("/home/dev/webshop");
        let rules = RulesConfig::default();
        assert_eq!(
            project.rules_dir(&rules),
            PathBuf::from("/home/dev/webshop/.cursor/rules")
        );
    }

    #[test]
    fn template_source_found_in_ancestor() {
        let home = tempdir().unwrap();
        let templates = home.path().join("tools/rule-server");
        template_manifest(&templates);
        let cwd = templates.join("packages/app");
        fs::create_dir_all(&cwd).unwrap();

        let source = find_template_source(&cwd, home.path(), &RulesConfig::default()).unwrap();

        assert_eq!(source.project.as_deref(), Some(templates.as_path()));
        assert_eq!(source.rules_dir, templates.join(".cursor/rules"));
        assert_eq!(source.origin, TemplateOrigin::Discovered);
    }

    #[test]
    fn malformed_or_unrelated_manifest_is_skipped() {
        let home = tempdir().unwrap();
        let cwd = home.path().join("app");
        fs::create_dir_all(&cwd).unwrap();
        fs::write(cwd.join("package.json"), "{ not json").unwrap();
        assert!(!is_template_project(&cwd));

        fs::write(cwd.join("package.json"), r#"{"dependencies":{"left-pad":"1"}}"#).unwrap();
        assert!(find_template_source(&cwd, home.path(), &RulesConfig::default()).is_none());
    }

    #[test]
    fn dev_dependency_counts() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            format!(r#"{{"devDependencies":{{"{SERVER_PACKAGE}":"*"}}}}"#),
        )
        .unwrap();
        assert!(is_template_project(dir.path()));
    }

    #[test]
    fn flag_beats_config_beats_discovery() {
        let home = tempdir().unwrap();
        template_manifest(home.path().join("srv").as_path());
        let cwd = home.path().join("srv");
        let mut rules = RulesConfig::default();

        let found = resolve_template_source(None, &rules, &cwd, home.path()).unwrap();
        assert_eq!(found.origin, TemplateOrigin::Discovered);

        rules.templates = Some(PathBuf::from("/opt/rules"));
        let found = resolve_template_source(None, &rules, &cwd, home.path()).unwrap();
        assert_eq!(found.origin, TemplateOrigin::Config);
        assert_eq!(found.rules_dir, PathBuf::from("/opt/rules"));

        let flag = PathBuf::from("/srv/rules");
        let found = resolve_template_source(Some(&flag), &rules, &cwd, home.path()).unwrap();
        assert_eq!(found.origin, TemplateOrigin::Flag);
        assert_eq!(found.rules_dir, flag);
    }
}
