use crate::{FooterError, FooterResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Comment line that opens the footer block on every page.
pub const DEFAULT_MARKER: &str = "    <!-- Footer -->";

/// What to patch and what to put there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    /// Directory the page paths are relative to
    pub root: PathBuf,
    /// Page paths, patched in order
    pub pages: Vec<String>,
    /// Replacement block, including the marker line
    pub template: String,
    /// Literal text the footer region starts at
    pub marker: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatchConfig {
    #[serde(default)]
    root: Option<PathBuf>,
    pages: Vec<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    template_file: Option<PathBuf>,
    #[serde(default)]
    marker: Option<String>,
}

impl PatchConfig {
    pub fn new(root: impl Into<PathBuf>, pages: Vec<String>, template: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            pages,
            template: template.into(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Parses a TOML config. Relative `root` and `template_file` paths are
    /// resolved against `base_dir`.
    ///
    /// ```toml
    /// root = "frontend"
    /// pages = ["index.html", "booking.html"]
    /// template_file = "footer.html"
    /// ```
    pub fn from_toml_str(text: &str, base_dir: &Path) -> FooterResult<Self> {
        let raw: RawPatchConfig = toml::from_str(text)?;

        let template = match (raw.template, raw.template_file) {
            (Some(_), Some(_)) => {
                return Err(FooterError::InvalidConfig(
                    "set either `template` or `template_file`, not both".to_string(),
                ))
            }
            (Some(template), None) => template.trim_end_matches(['\r', '\n']).to_string(),
            (None, Some(file)) => {
                let path = base_dir.join(file);
                std::fs::read_to_string(&path)?
                    .trim_end_matches(['\r', '\n'])
                    .to_string()
            }
            (None, None) => {
                return Err(FooterError::InvalidConfig(
                    "one of `template` or `template_file` is required".to_string(),
                ))
            }
        };

        let config = Self {
            root: base_dir.join(raw.root.unwrap_or_default()),
            pages: raw.pages,
            template,
            marker: raw.marker.unwrap_or_else(|| DEFAULT_MARKER.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> FooterResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&text, base_dir)
    }

    pub fn validate(&self) -> FooterResult<()> {
        if self.pages.is_empty() {
            return Err(FooterError::InvalidConfig(
                "page list cannot be empty".to_string(),
            ));
        }

        if self.marker.trim().is_empty() {
            return Err(FooterError::InvalidConfig(
                "marker cannot be empty".to_string(),
            ));
        }

        // The template replaces the whole region, marker line included, so it
        // must carry the marker exactly as the pages do.
        if !self.template.starts_with(&self.marker) {
            return Err(FooterError::InvalidConfig(
                "template must start with the marker comment".to_string(),
            ));
        }

        if !self.template.ends_with("</footer>") {
            return Err(FooterError::InvalidConfig(
                "template must end with </footer>".to_string(),
            ));
        }

        Ok(())
    }
}
