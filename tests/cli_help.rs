use std::process::Command;

#[test]
fn test_help_mentions_default_serve() {
    let bin = env!("CARGO_BIN_EXE_ruledeck");

    let output = Command::new(bin).arg("--help").output().unwrap();

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Run 'ruledeck' without arguments to start the rules server."),
        "help output should mention the default command; got:\n{}",
        stdout
    );
    for command in ["serve", "init", "check", "list", "watch", "config"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

#[test]
fn test_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_ruledeck"))
        .arg("--version")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
