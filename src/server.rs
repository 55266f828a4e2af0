//! Supervising the external protocol server
//!
//! The server is a plain child process that shares our stdin/stdout with the
//! IDE. We only start it, poll it, and stop it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};

use serde::Serialize;

use crate::config::ServerConfig;
use crate::error::{RuledeckError, RuledeckResult};

/// What to run and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory (the rules directory)
    pub cwd: PathBuf,
    /// Added on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl ServerSpec {
    pub fn from_config(server: &ServerConfig, cwd: &Path) -> Self {
        Self {
            program: server.command.clone(),
            args: server.args.clone(),
            cwd: cwd.to_path_buf(),
            env: server.env.clone(),
        }
    }

    /// Human-readable command line
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .current_dir(&self.cwd)
            .envs(&self.env)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// How the server ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerExit {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ServerExit {
    fn from_status(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }

    /// Exit code to forward; signal deaths map to 1
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(1)
    }
}

/// A running server
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
    command_line: String,
    reaped: Option<ServerExit>,
}

impl ServerProcess {
    pub fn spawn(spec: &ServerSpec) -> RuledeckResult<Self> {
        let child = spec
            .command()
            .spawn()
            .map_err(|source| RuledeckError::ServerSpawn {
                command: spec.command_line(),
                source,
            })?;
        Ok(Self {
            child,
            command_line: spec.command_line(),
            reaped: None,
        })
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Non-blocking check; `Some` once the server has exited
    pub fn try_exit(&mut self) -> RuledeckResult<Option<ServerExit>> {
        if let Some(exit) = self.reaped {
            return Ok(Some(exit));
        }
        let exit = self.child.try_wait()?.map(ServerExit::from_status);
        self.reaped = exit;
        Ok(exit)
    }

    /// Kill the server (if still running) and reap it
    pub fn shutdown(&mut self) -> RuledeckResult<ServerExit> {
        if let Some(exit) = self.try_exit()? {
            return Ok(exit);
        }
        // It may exit between the check and the kill
        if let Err(e) = self.child.kill() {
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(e.into());
            }
        }
        let exit = ServerExit::from_status(self.child.wait()?);
        self.reaped = Some(exit);
        Ok(exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn spec(program: &str, args: &[&str], cwd: &Path) -> ServerSpec {
        ServerSpec {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: cwd.to_path_buf(),
            env: BTreeMap::new(),
        }
    }

    fn wait_for_exit(server: &mut ServerProcess) -> ServerExit {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(exit) = server.try_exit().unwrap() {
                return exit;
            }
            assert!(Instant::now() < deadline, "server did not exit");
            std::thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn spec_from_default_config() {
        let spec = ServerSpec::from_config(&ServerConfig::default(), Path::new("/p/.cursor/rules"));
        assert_eq!(
            spec.command_line(),
            "npx @modelcontextprotocol/server-filesystem ."
        );
        assert_eq!(spec.cwd, PathBuf::from("/p/.cursor/rules"));
    }

    #[test]
    fn spawn_failure_names_the_command() {
        let dir = tempdir().unwrap();
        let err = ServerProcess::spawn(&spec("ruledeck-no-such-binary", &["x"], dir.path()))
            .unwrap_err();

        assert!(matches!(err, RuledeckError::ServerSpawn { .. }));
        assert!(err.to_string().contains("ruledeck-no-such-binary x"));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_forwarded() {
        let dir = tempdir().unwrap();
        let mut server = ServerProcess::spawn(&spec("sh", &["-c", "exit 3"], dir.path())).unwrap();

        let exit = wait_for_exit(&mut server);
        assert_eq!(exit.exit_code(), 3);
        // Reaping twice is fine
        assert_eq!(server.shutdown().unwrap(), exit);
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_rules_dir_with_extra_env() {
        let dir = tempdir().unwrap();
        let mut spec = spec(
            "sh",
            &["-c", "pwd > cwd.txt; printf %s \"$RULEDECK_TEST\" > env.txt"],
            dir.path(),
        );
        spec.env
            .insert("RULEDECK_TEST".to_string(), "hello".to_string());
        let mut server = ServerProcess::spawn(&spec).unwrap();

        assert_eq!(wait_for_exit(&mut server).exit_code(), 0);
        let cwd = std::fs::read_to_string(dir.path().join("cwd.txt")).unwrap();
        assert_eq!(
            Path::new(cwd.trim()).canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("env.txt")).unwrap(),
            "hello"
        );
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_kills_a_running_server() {
        let dir = tempdir().unwrap();
        let mut server = ServerProcess::spawn(&spec("sleep", &["30"], dir.path())).unwrap();
        assert!(server.try_exit().unwrap().is_none());

        let exit = server.shutdown().unwrap();

        assert_eq!(exit.code, None);
        assert_eq!(exit.exit_code(), 1);
    }
}
