#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use resdesc::{BundleCatalog, PathAddress, RegistrationTree, StandardResolver, resolver_for_address};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;
use tempfile::TempDir;

pub const BUNDLE_NAME: &str = "messages";

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn mocks_dir() -> PathBuf {
    repo_root().join("tests").join("mocks")
}

pub fn fixture_model_path() -> PathBuf {
    mocks_dir().join("server_model.json")
}

pub fn fixture_bundle_dir() -> PathBuf {
    mocks_dir().join("bundles")
}

pub fn load_fixture_tree() -> Result<RegistrationTree> {
    RegistrationTree::load(&fixture_model_path())
}

pub fn fixture_catalog() -> Result<Arc<BundleCatalog>> {
    Ok(Arc::new(BundleCatalog::load_dir(
        &fixture_bundle_dir(),
        BUNDLE_NAME,
    )?))
}

/// Resolver for `address` in the fixture tree, rooted at the model's prefix.
pub fn fixture_resolver(tree: &RegistrationTree, address: &str) -> Result<StandardResolver> {
    let address: PathAddress = address.parse()?;
    resolver_for_address(tree, &address, fixture_catalog()?, "")
}

/// Write `model` to a fresh temp dir and return the dir with the file path.
pub fn write_model(model: &Value) -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new().context("failed to allocate model dir")?;
    let path = dir.path().join("model.json");
    fs::write(&path, serde_json::to_vec_pretty(model)?)?;
    Ok((dir, path))
}

/// Write one bundle file per `(file_name, table)` pair into a fresh temp dir.
pub fn write_bundles(files: &[(&str, Value)]) -> Result<TempDir> {
    let dir = TempDir::new().context("failed to allocate bundle dir")?;
    for (name, table) in files {
        write_json(&dir.path().join(name), table)?;
    }
    Ok(dir)
}

pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn describe_resource_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_describe-resource"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn keys_of(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}
