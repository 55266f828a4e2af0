//! Common test utilities for ruledeck CLI tests.
//!
//! `TestEnv` gives every test its own HOME with a project inside it, and
//! runs the binary with the environment scrubbed of user settings.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub const VALID_RULE: &str = "---\ndescription: Rust style\nglobs: src/**/*.rs\n---\nUse rustfmt.\n";
pub const RULE_WITHOUT_GLOBS: &str = "---\ndescription: Naming\n---\nBe consistent.\n";

/// Result of running the ruledeck binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Parse every stdout line as a JSON event
    pub fn stdout_events(&self) -> Vec<serde_json::Value> {
        parse_events(&self.stdout)
    }

    pub fn stderr_events(&self) -> Vec<serde_json::Value> {
        parse_events(&self.stderr)
    }
}

fn parse_events(text: &str) -> Vec<serde_json::Value> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("not a JSON line ({e}): {line}"))
        })
        .collect()
}

/// Find the first event with the given `event` tag
pub fn find_event<'a>(events: &'a [serde_json::Value], name: &str) -> Option<&'a serde_json::Value> {
    events.iter().find(|e| e["event"] == name)
}

/// Isolated HOME containing one project (`webshop`, marked by `.git`)
pub struct TestEnv {
    home: TempDir,
    home_path: PathBuf,
    project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_project("webshop")
    }

    pub fn with_project(relative: &str) -> Self {
        let home = tempfile::tempdir().expect("Failed to create temp home");
        // The binary compares against the canonical cwd
        let home_path = home
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp home");
        let project = home_path.join(relative);
        std::fs::create_dir_all(project.join(".git")).expect("Failed to create project");
        Self {
            home,
            home_path,
            project,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home_path
    }

    pub fn project(&self) -> &Path {
        &self.project
    }

    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project.join(relative)
    }

    pub fn rules_path(&self, name: &str) -> PathBuf {
        self.project.join(".cursor/rules").join(name)
    }

    pub fn write_home_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.home_path.join(relative), content)
    }

    pub fn write_project_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.project.join(relative), content)
    }

    pub fn write_rule(&self, name: &str, content: &str) -> PathBuf {
        write_file(&self.rules_path(name), content)
    }

    pub fn read_project_file(&self, relative: &str) -> String {
        let path = self.project.join(relative);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }

    /// Run the binary from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(&self.project, args)
    }

    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        self.command(&self.project, args, env_vars)
    }

    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        self.command(cwd, args, &[])
    }

    fn command(&self, cwd: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ruledeck"));
        cmd.current_dir(cwd)
            .args(args)
            .env("HOME", &self.home_path)
            .env("USERPROFILE", &self.home_path)
            .env("XDG_CONFIG_HOME", self.home_path.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("RULEDECK_TEMPLATES")
            .env_remove("RULEDECK_RULES_DIR")
            .env_remove("RULEDECK_WATCH")
            .env_remove("RULEDECK_SERVER_COMMAND");
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute ruledeck");
        TestResult::from_output(output)
    }
}

fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
    path.to_path_buf()
}
