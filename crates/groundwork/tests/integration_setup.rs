#![cfg(unix)]
//! Integration tests driving the real binary against stub tools
//!
//! The stubs (tiny shell scripts on a prepended PATH) mimic the observable
//! side effects of hg, gradle, jerkar, and eclipse, and append every
//! invocation to a log file so the tests can assert how many subprocesses a
//! run actually spawned.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HG_STUB: &str = r#"#!/bin/sh
echo "hg $*" >> "$TOOL_LOG"
if [ "$1" = "--noninteractive" ]; then shift; fi
if [ "$1" = "clone" ]; then
    case "$*" in
        *8u-dev/rt*)
            printf 'COMPILE_TARGETS = linux\n' > gradle.properties.template
            mkdir -p buildSrc
            printf '<classpath><lib path="../build/libs"/></classpath>\n' > buildSrc/.classpath
            ;;
        *jfxgl-demos*)
            cp "$STUB_DIR/jerkar" jerkar
            chmod +x jerkar
            ;;
        *jfxgl*)
            cp "$STUB_DIR/jerkar" jerkar
            chmod +x jerkar
            : > openjfx.8u121.patch
            ;;
    esac
fi
exit 0
"#;

const GRADLE_STUB: &str = r#"#!/bin/sh
echo "gradle $*" >> "$TOOL_LOG"
for m in base controls fxml graphics; do
    mkdir -p "modules/$m/build/classes/main"
    : > "modules/$m/build/classes/main/Stub.class"
done
exit 0
"#;

const ECLIPSE_STUB: &str = r#"#!/bin/sh
echo "eclipse $*" >> "$TOOL_LOG"
exit 0
"#;

const JERKAR_STUB: &str = r#"#!/bin/sh
echo "jerkar $*" >> "$TOOL_LOG"
exit 0
"#;

struct Workspace {
    tmp: TempDir,
    stub_dir: PathBuf,
    log: PathBuf,
}

impl Workspace {
    /// Temp workspace with a JDK fixture and stub tools
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();

        let jdk = tmp.path().join("openjdk-8u121");
        fs::create_dir_all(jdk.join("bin")).unwrap();
        fs::create_dir_all(jdk.join("jre/lib/ext")).unwrap();
        fs::write(jdk.join("bin/java"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(jdk.join("bin/java"), fs::Permissions::from_mode(0o755)).unwrap();
        fs::write(jdk.join("jre/lib/ext/jfxrt.jar"), "jar").unwrap();

        let stub_dir = tmp.path().join("stub-bin");
        fs::create_dir_all(&stub_dir).unwrap();
        for (name, content) in [
            ("hg", HG_STUB),
            ("gradle", GRADLE_STUB),
            ("eclipse", ECLIPSE_STUB),
            ("jerkar", JERKAR_STUB),
        ] {
            let path = stub_dir.join(name);
            fs::write(&path, content).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let log = tmp.path().join("tool.log");
        Self { tmp, stub_dir, log }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let path = format!(
            "{}:{}",
            self.stub_dir.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::cargo_bin("groundwork").unwrap();
        cmd.current_dir(self.root())
            .env("PATH", path)
            .env("TOOL_LOG", &self.log)
            .env("STUB_DIR", &self.stub_dir)
            .args(args);
        cmd
    }

    fn invocation_count(&self) -> usize {
        fs::read_to_string(&self.log)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }
}

#[test]
fn setup_end_to_end_produces_every_artifact() {
    let ws = Workspace::new();

    ws.cmd(&["setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("And we're all done!"));

    let mirror = ws.root().join("openjdk-8u121-noFX");
    assert!(mirror.join("bin/java").exists());
    assert!(!mirror.join("jre/lib/ext/jfxrt.jar").exists());
    let mode = mirror.join("bin/java").metadata().unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0, "executable bit lost by the mirror");

    let props = fs::read_to_string(ws.root().join("openjfx/gradle.properties")).unwrap();
    assert!(props.contains("COMPILE_TARGETS = linux"));
    assert!(props.contains(&format!("JDK_HOME = {}", mirror.display())));

    assert!(ws
        .root()
        .join("openjfx/modules/graphics/bin/Stub.class")
        .exists());
    assert!(ws.root().join("openjfx/.jfxgl-patch-applied").exists());
    assert!(ws.root().join("JFXGL/jerkar").exists());
    assert!(ws.root().join("JFXGL-demos").exists());
    assert!(ws.root().join(".metadata").exists());

    let classpath = fs::read_to_string(ws.root().join("openjfx/buildSrc/.classpath")).unwrap();
    assert!(!classpath.contains("../build/libs"));
}

#[test]
fn second_setup_spawns_no_subprocesses() {
    let ws = Workspace::new();

    ws.cmd(&["setup"]).assert().success();
    let after_first = ws.invocation_count();
    assert!(after_first > 0);

    ws.cmd(&["setup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already complete"));
    assert_eq!(ws.invocation_count(), after_first);
}

#[test]
fn missing_tools_abort_before_any_stage_with_exit_2() {
    let ws = Workspace::new();

    ws.cmd(&[
        "setup",
        "--hg",
        "no-such-hg-xyz",
        "--eclipse",
        "no-such-eclipse-xyz",
    ])
    .assert()
    .code(2)
    .stderr(
        predicate::str::contains("no-such-hg-xyz")
            .and(predicate::str::contains("no-such-eclipse-xyz")),
    );

    // nothing ran and nothing was created
    assert_eq!(ws.invocation_count(), 0);
    assert!(!ws.root().join("openjdk-8u121-noFX").exists());
}

#[test]
fn missing_jdk_fails_preflight() {
    let ws = Workspace::new();
    fs::remove_dir_all(ws.root().join("openjdk-8u121")).unwrap();

    ws.cmd(&["setup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No JDK found"));
    assert_eq!(ws.invocation_count(), 0);
}

#[test]
fn clean_removes_generated_directories_only() {
    let ws = Workspace::new();
    ws.cmd(&["setup"]).assert().success();

    ws.cmd(&["clean"]).assert().success();

    for dir in [
        "openjdk-8u121-noFX",
        "openjfx",
        "JFXGL",
        "JFXGL-demos",
        ".metadata",
    ] {
        assert!(!ws.root().join(dir).exists(), "{} not removed", dir);
    }
    assert!(ws.root().join("openjdk-8u121").exists());

    // a setup after clean rebuilds everything
    ws.cmd(&["setup"]).assert().success();
    assert!(ws.root().join(".metadata").exists());
}

#[test]
fn rebuild_requires_setup_first() {
    let ws = Workspace::new();

    ws.cmd(&["rebuild"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not been cloned"));

    ws.cmd(&["setup"]).assert().success();
    let before = ws.invocation_count();

    ws.cmd(&["rebuild"]).assert().success();
    assert_eq!(ws.invocation_count(), before + 1);
}

#[test]
fn config_file_supplies_tool_overrides() {
    let ws = Workspace::new();

    // route hg through an absolute stub path via the config file
    fs::write(
        ws.root().join("groundwork.toml"),
        format!("[tools]\nhg = \"{}\"\n", ws.stub_dir.join("hg").display()),
    )
    .unwrap();

    ws.cmd(&["setup"]).assert().success();
    assert!(ws.root().join("openjfx").exists());
}
