//! The concrete setup pipeline
//!
//! Declares the stages that bootstrap the JFXGL development environment, in
//! fixed dependency order:
//!
//! 1. `mirror-jdk` — copy the installed JDK into an isolated `-noFX` mirror
//! 2. `strip-javafx` — delete the bundled `jfxrt.jar` from the mirror
//! 3. `clone-openjfx` — hg clone OpenJFX at the pinned revision
//! 4. `build-openjfx` — generate `gradle.properties`, run gradle, stage the
//!    per-module class output where Eclipse expects it
//! 5. `clone-jfxgl` — hg clone JFXGL and generate its Eclipse files
//! 6. `patch-openjfx` — apply JFXGL's OpenJFX patch, tracked by a marker
//!    inside the OpenJFX tree so a reset tree is re-patched
//! 7. `clone-demos` — hg clone the demos and generate their Eclipse files
//! 8. `eclipse-workspace` — fix the generated buildSrc classpath and run the
//!    Eclipse Ant tasks that register the JRE, import the projects, and set
//!    the classpath variable
//!
//! Each stage's completion predicate is decided purely from filesystem
//! existence, so a rerun (including after a crash) reconstructs progress
//! from disk alone.

use crate::errors::{path_io, ConfigError, Result};
use crate::mirror::copy_dir_all;
use crate::patch::{append_line, replace_in_file};
use crate::process::CommandRunner;
use crate::stage::{Stage, StageContext};
use crate::config::SetupConfig;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Pinned OpenJFX revision known to match the JFXGL patch
pub const OPENJFX_COMMIT: &str = "149fdbc41c8f5ab43c0414b970d9133e1f4e9cbd";

/// OpenJFX upstream repository
pub const OPENJFX_URL: &str = "http://hg.openjdk.java.net/openjfx/8u-dev/rt";

/// JFXGL repository
pub const JFXGL_URL: &str = "https://cuchaz@bitbucket.org/cuchaz/jfxgl";

/// JFXGL demos repository
pub const DEMOS_URL: &str = "https://cuchaz@bitbucket.org/cuchaz/jfxgl-demos";

/// Patch file shipped inside the JFXGL clone, applied to the OpenJFX tree
pub const OPENJFX_PATCH_FILE: &str = "openjfx.8u121.patch";

/// OpenJFX modules whose compiled classes are staged for Eclipse
pub const OPENJFX_MODULES: [&str; 4] = ["base", "controls", "fxml", "graphics"];

/// The full setup pipeline in dependency order
pub fn stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(MirrorJdkStage),
        Box::new(StripJavaFxStage),
        Box::new(CloneOpenJfxStage),
        Box::new(BuildOpenJfxStage),
        Box::new(CloneJfxglStage),
        Box::new(PatchOpenJfxStage),
        Box::new(CloneDemosStage),
        Box::new(WorkspaceStage),
    ]
}

/// Run `hg` in `cwd`, always in noninteractive mode
fn hg(ctx: &StageContext, cwd: &Path, args: &[&str]) -> Result<()> {
    let tool = ctx.config.hg();
    let mut full = vec!["--noninteractive"];
    full.extend_from_slice(args);
    ctx.runner
        .run_checked(cwd, tool.program(), &tool.args_with(&full))
}

/// Run the jerkar wrapper embedded in a cloned repository
fn jerkar(ctx: &StageContext, cwd: &Path, task: &str) -> Result<()> {
    ctx.runner
        .run_checked(cwd, "./jerkar", &[task.to_string()])
}

fn remove_dir_if_present(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(path_io("remove directory", path, e)),
    }
}

fn remove_file_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(path_io("remove", path, e)),
    }
}

/// Copy the installed JDK into the isolated `-noFX` mirror
pub struct MirrorJdkStage;

impl Stage for MirrorJdkStage {
    fn name(&self) -> &'static str {
        "mirror-jdk"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.jdk_mirror_dir().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        info!("Copying JDK...");
        copy_dir_all(ctx.config.jdk_dir(), &ctx.config.jdk_mirror_dir())?;
        info!("JDK copied");
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        // The completion predicate is keyed on the mirror root's existence,
        // so a partial copy must be removed entirely.
        remove_dir_if_present(&ctx.config.jdk_mirror_dir())
    }
}

/// Delete the bundled JavaFX jar from the mirror
pub struct StripJavaFxStage;

impl Stage for StripJavaFxStage {
    fn name(&self) -> &'static str {
        "strip-javafx"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        !ctx.config.javafx_jar().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let jar = ctx.config.javafx_jar();
        fs::remove_file(&jar).map_err(|e| path_io("remove", &jar, e))?;
        info!("Deleted JavaFX jar");
        Ok(())
    }
}

/// Clone OpenJFX at the pinned revision
pub struct CloneOpenJfxStage;

impl Stage for CloneOpenJfxStage {
    fn name(&self) -> &'static str {
        "clone-openjfx"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.openjfx_dir().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let dir = ctx.config.openjfx_dir();
        fs::create_dir_all(&dir).map_err(|e| path_io("create directory", &dir, e))?;

        info!("Downloading OpenJFX... (it's ~690 MiB, so this can take a while)");
        hg(ctx, &dir, &["clone", "-r", OPENJFX_COMMIT, OPENJFX_URL, "."])?;
        info!("Downloaded OpenJFX");
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        // hg refuses to clone into a non-empty directory, so a partial clone
        // must not survive into the next run
        remove_dir_if_present(&ctx.config.openjfx_dir())
    }
}

/// Configure and run the OpenJFX gradle build, then stage each module's
/// compiled classes into the `bin` directory Eclipse builds against
pub struct BuildOpenJfxStage;

impl Stage for BuildOpenJfxStage {
    fn name(&self) -> &'static str {
        "build-openjfx"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        // The generated gradle.properties is this stage's completion marker;
        // rollback deletes it so a half-finished build is retried.
        ctx.config.gradle_properties().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let openjfx = ctx.config.openjfx_dir();
        let template = openjfx.join("gradle.properties.template");
        let props = ctx.config.gradle_properties();

        info!("Configuring OpenJFX build...");
        fs::copy(&template, &props).map_err(|e| path_io("copy", &template, e))?;
        append_line(
            &props,
            &format!("JDK_HOME = {}", ctx.config.jdk_mirror_dir().display()),
        )?;

        info!("Building OpenJFX...");
        let gradle = ctx.config.gradle();
        ctx.runner
            .run_checked(&openjfx, gradle.program(), &gradle.args_with(&[]))?;

        for module in OPENJFX_MODULES {
            let src = openjfx.join(format!("modules/{}/build/classes/main", module));
            let dst = openjfx.join(format!("modules/{}/bin", module));
            fs::create_dir_all(&dst).map_err(|e| path_io("create directory", &dst, e))?;
            copy_dir_all(&src, &dst)?;
        }
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        remove_file_if_present(&ctx.config.gradle_properties())
    }
}

/// Clone JFXGL and generate its Eclipse project files
pub struct CloneJfxglStage;

impl Stage for CloneJfxglStage {
    fn name(&self) -> &'static str {
        "clone-jfxgl"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.jfxgl_dir().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let dir = ctx.config.jfxgl_dir();
        fs::create_dir_all(&dir).map_err(|e| path_io("create directory", &dir, e))?;

        info!("Downloading JFXGL...");
        hg(ctx, &dir, &["clone", JFXGL_URL, "."])?;
        jerkar(ctx, &dir, "eclipse#generateFiles")?;
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        remove_dir_if_present(&ctx.config.jfxgl_dir())
    }
}

/// Apply JFXGL's patch to the OpenJFX tree
///
/// Keyed on its own marker inside the OpenJFX tree rather than on the JFXGL
/// directory's existence: if the OpenJFX tree is removed and re-cloned, the
/// marker disappears with it and the patch is re-applied on the next run.
pub struct PatchOpenJfxStage;

impl Stage for PatchOpenJfxStage {
    fn name(&self) -> &'static str {
        "patch-openjfx"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.patch_marker().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let openjfx = ctx.config.openjfx_dir();
        let patch = format!("../JFXGL/{}", OPENJFX_PATCH_FILE);

        info!("Patching OpenJFX...");
        hg(ctx, &openjfx, &["revert", "--all"])?;
        hg(ctx, &openjfx, &["patch", "--no-commit", &patch])?;

        let marker = ctx.config.patch_marker();
        fs::write(&marker, format!("{}\n", OPENJFX_PATCH_FILE))
            .map_err(|e| path_io("write", &marker, e))?;
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        remove_file_if_present(&ctx.config.patch_marker())
    }
}

/// Clone the JFXGL demos and generate their Eclipse project files
pub struct CloneDemosStage;

impl Stage for CloneDemosStage {
    fn name(&self) -> &'static str {
        "clone-demos"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.demos_dir().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let dir = ctx.config.demos_dir();
        fs::create_dir_all(&dir).map_err(|e| path_io("create directory", &dir, e))?;

        info!("Downloading JFXGL demos...");
        hg(ctx, &dir, &["clone", DEMOS_URL, "."])?;
        jerkar(ctx, &dir, "eclipse#generateFiles")?;
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        remove_dir_if_present(&ctx.config.demos_dir())
    }
}

/// Create the Eclipse workspace: fix the generated buildSrc classpath, then
/// hand off to the Eclipse Ant runner for the IDE-side configuration calls
/// (register JRE, import projects, set the classpath variable)
pub struct WorkspaceStage;

impl Stage for WorkspaceStage {
    fn name(&self) -> &'static str {
        "eclipse-workspace"
    }

    fn is_complete(&self, ctx: &StageContext) -> bool {
        ctx.config.metadata_dir().exists()
    }

    fn run(&self, ctx: &StageContext) -> Result<()> {
        let cwd = ctx.config.working_dir();
        let metadata = ctx.config.metadata_dir();

        info!("Creating Eclipse workspace...");
        fs::create_dir_all(&metadata).map_err(|e| path_io("create directory", &metadata, e))?;

        // The generated classpath points at ../build/libs relative to
        // buildSrc, which Eclipse resolves against the wrong root
        let classpath = ctx.config.openjfx_dir().join("buildSrc/.classpath");
        let libs = ctx.config.openjfx_dir().join("build/libs");
        replace_in_file(&classpath, "../build/libs", &libs.display().to_string())?;

        let eclipse = ctx.config.eclipse();
        let buildfile = cwd.join("build/def/setupEclipse.xml");
        let cwd_arg = cwd.display().to_string();
        let buildfile_arg = buildfile.display().to_string();
        ctx.runner.run_checked(
            cwd,
            eclipse.program(),
            &eclipse.args_with(&[
                "-nosplash",
                "-data",
                &cwd_arg,
                "-application",
                "org.eclipse.ant.core.antRunner",
                "-buildfile",
                &buildfile_arg,
            ]),
        )?;
        Ok(())
    }

    fn rollback(&self, ctx: &StageContext) -> Result<()> {
        remove_dir_if_present(&ctx.config.metadata_dir())
    }
}

/// Remove every generated top-level directory
///
/// Best-effort like the stages' own rollbacks: a directory that will not
/// delete is reported and skipped rather than aborting the rest.
pub fn clean(config: &SetupConfig) -> Result<()> {
    for dir in config.generated_dirs() {
        match fs::remove_dir_all(&dir) {
            Ok(()) => info!("Removed {}", dir.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {}: {}", dir.display(), e),
        }
    }
    Ok(())
}

/// Rerun the OpenJFX gradle build and refresh the staged module classes,
/// without touching the rest of the pipeline
pub fn rebuild(config: &SetupConfig, runner: &dyn CommandRunner) -> Result<()> {
    let openjfx = config.openjfx_dir();
    if !openjfx.exists() {
        return Err(ConfigError::Validation {
            message: "OpenJFX has not been cloned yet; run `groundwork setup` first".to_string(),
        }
        .into());
    }

    info!("Rebuilding OpenJFX...");
    let gradle = config.gradle();
    runner.run_checked(&openjfx, gradle.program(), &gradle.args_with(&[]))?;

    for module in OPENJFX_MODULES {
        let src = openjfx.join(format!("modules/{}/build/classes/main", module));
        let dst = openjfx.join(format!("modules/{}/bin", module));
        fs::create_dir_all(&dst).map_err(|e| path_io("create directory", &dst, e))?;
        copy_dir_all(&src, &dst)?;
    }
    info!("OpenJFX rebuilt");
    Ok(())
}
