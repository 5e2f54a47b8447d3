use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

/// Environment variable that overrides the location of [`Bundle::main`].
pub const ASSETS_ENV: &str = "TEXVIEW_ASSETS";

/// Extensions tried, in order, when a name has no file of its own.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "ico"];

/// Resource container that image identifiers are resolved against.
///
/// Lookup order for a name:
/// 1. in-memory entries registered with [`Bundle::insert`]
/// 2. `<root>/<name>`
/// 3. `<root>/<name>.<ext>` for each of [`IMAGE_EXTENSIONS`]
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    root: Option<PathBuf>,
    entries: HashMap<String, Arc<[u8]>>,
}

impl Bundle {
    /// Directory-backed bundle.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            entries: HashMap::new(),
        }
    }

    /// Bundle with no directory; only inserted entries resolve.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// The application's default bundle.
    ///
    /// `$TEXVIEW_ASSETS` if set, else `assets/` next to the executable when it
    /// exists, else `./assets`.
    pub fn main() -> Self {
        if let Some(dir) = std::env::var_os(ASSETS_ENV) {
            return Self::new(dir);
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.join("assets")))
            .filter(|dir| dir.is_dir());

        Self::new(beside_exe.unwrap_or_else(|| PathBuf::from("assets")))
    }

    /// Registers encoded image bytes under `name`, shadowing any file.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        let bytes: Vec<u8> = bytes.into();
        self.entries.insert(name.into(), Arc::from(bytes));
    }

    pub fn with_entry(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Returns the file backing `name`, if any.
    ///
    /// In-memory entries have no path and are not reported here.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        validate_name(name).ok()?;
        let root = self.root.as_deref()?;

        let exact = root.join(name);
        if exact.is_file() {
            return Some(exact);
        }

        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| root.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Reads the encoded bytes for `name`.
    pub fn read(&self, name: &str) -> Result<Cow<'_, [u8]>> {
        validate_name(name)?;

        if let Some(bytes) = self.entries.get(name) {
            return Ok(Cow::Borrowed(&bytes[..]));
        }

        let path = self.resolve(name).with_context(|| match &self.root {
            Some(root) => format!("image `{name}` not found in {}", root.display()),
            None => format!("image `{name}` not found in bundle"),
        })?;

        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Cow::Owned(bytes))
    }
}

fn validate_name(name: &str) -> Result<()> {
    anyhow::ensure!(!name.trim().is_empty(), "image name is empty");

    let escapes = Path::new(name)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    anyhow::ensure!(!escapes, "image name `{name}` must stay inside the bundle");

    Ok(())
}
