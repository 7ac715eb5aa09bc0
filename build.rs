use anyhow::{anyhow, bail, Error, Result};
use chrono::Utc;
use std::{
    env::{var, VarError},
    fs,
    path::Path,
    process::Command,
};

fn main() -> Result<()> {
    rerun_if_git_changes()?;

    println!(
        "cargo:rustc-env=COMMIT_SHA={}",
        env_or_cmd("COMMIT_SHA", &["git", "rev-parse", "--short=8", "HEAD"])
            .unwrap_or_else(|_| "unknown".to_string())
    );
    println!("cargo:rustc-env=BUILD_DATE={}", Utc::now().date_naive());
    Ok(())
}

/// Value of `env` when set, otherwise the trimmed stdout of `cmd`.
fn env_or_cmd(env: &str, cmd: &[&str]) -> Result<String> {
    match var(env) {
        Ok(value) => return Ok(value),
        Err(VarError::NotPresent) => {}
        Err(err) => return Err(Error::new(err)),
    }

    let (program, args) = cmd
        .split_first()
        .ok_or_else(|| anyhow!("empty command for {env}"))?;
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        bail!("{env} is unset and `{}` exited with {}", cmd.join(" "), output.status);
    }
    Ok(String::from_utf8(output.stdout)?.trim().to_owned())
}

fn rerun_if_git_changes() -> Result<()> {
    // Skip if not in a git repo
    if !Path::new(".git/HEAD").exists() {
        eprintln!("No .git/HEAD found, not rerunning on git change");
        return Ok(());
    }

    println!("cargo:rerun-if-changed=.git/HEAD");

    // A detached HEAD holds a bare hash, nothing else to watch.
    let contents = String::from_utf8(fs::read(".git/HEAD")?)?;
    if let Some(head_ref) = contents.trim().strip_prefix("ref: ") {
        println!("cargo:rerun-if-changed=.git/{head_ref}");
    }
    Ok(())
}
