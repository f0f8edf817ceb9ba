//! Footer maintenance for the arena's static pages
//!
//! Every page carries one footer block that starts at a marker comment and
//! ends at the closing `</footer>` tag. [`FooterPatcher`] swaps that block for
//! a template across a list of pages, one file at a time.

pub mod config;
pub mod presets;

pub use config::{PatchConfig, DEFAULT_MARKER};
pub use presets::Preset;

use regex::Regex;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors related to footer patching
#[derive(Error, Debug)]
pub enum FooterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No footer block found in {path}")]
    FooterNotFound { path: String },
    #[error("Expected exactly one footer block in {path}, found {count}")]
    MultipleFooters { path: String, count: usize },
    #[error("Invalid footer pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

pub type FooterResult<T> = Result<T, FooterError>;

/// What happened to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The footer block was rewritten.
    Replaced,
    /// The footer block already matched the template; the file was not touched.
    Unchanged,
}

/// Per-page results of a [`FooterPatcher::patch_all`] run, in page order.
#[derive(Debug, Default)]
pub struct PatchReport {
    pub entries: Vec<(String, FooterResult<PatchOutcome>)>,
}

impl PatchReport {
    pub fn replaced(&self) -> usize {
        self.count(PatchOutcome::Replaced)
    }

    pub fn unchanged(&self) -> usize {
        self.count(PatchOutcome::Unchanged)
    }

    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_err()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, outcome: PatchOutcome) -> usize {
        self.entries
            .iter()
            .filter(|(_, r)| matches!(r, Ok(o) if *o == outcome))
            .count()
    }
}

pub struct FooterPatcher {
    config: PatchConfig,
    region: Regex,
}

impl FooterPatcher {
    pub fn new(config: PatchConfig) -> FooterResult<Self> {
        config.validate()?;
        // Non-greedy: each marker pairs with the first </footer> after it.
        let region = Regex::new(&format!(r"(?s){}.*?</footer>", regex::escape(&config.marker)))?;

        // A patched page must match the template as one whole region, or the
        // next run would not recognise its own output.
        let mut matches = region.find_iter(&config.template);
        let spans_template = matches
            .next()
            .is_some_and(|m| m.start() == 0 && m.end() == config.template.len());
        let extra_match = matches.next().is_some();
        drop(matches);
        if !spans_template || extra_match {
            return Err(FooterError::InvalidConfig(
                "template must be exactly one marker ... </footer> block".to_string(),
            ));
        }

        Ok(Self { config, region })
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Replaces the single footer region in `content`.
    ///
    /// `path` is only used in error messages.
    pub fn patch_content(&self, path: &str, content: &str) -> FooterResult<(String, PatchOutcome)> {
        let mut regions = self.region.find_iter(content);
        let Some(found) = regions.next() else {
            return Err(FooterError::FooterNotFound {
                path: path.to_string(),
            });
        };

        let extra = regions.count();
        if extra > 0 {
            return Err(FooterError::MultipleFooters {
                path: path.to_string(),
                count: extra + 1,
            });
        }

        if found.as_str() == self.config.template {
            return Ok((content.to_string(), PatchOutcome::Unchanged));
        }

        let mut patched = String::with_capacity(
            content.len() - found.len() + self.config.template.len(),
        );
        patched.push_str(&content[..found.start()]);
        patched.push_str(&self.config.template);
        patched.push_str(&content[found.end()..]);
        Ok((patched, PatchOutcome::Replaced))
    }

    /// Patches one file in place. The new content is written to a temporary
    /// file next to the target and renamed over it, so a crash never leaves a
    /// half-written page.
    pub fn patch_file(&self, path: &Path) -> FooterResult<PatchOutcome> {
        let shown = path.display().to_string();
        let content = std::fs::read_to_string(path)?;
        let (patched, outcome) = self.patch_content(&shown, &content)?;

        if outcome == PatchOutcome::Unchanged {
            debug!("{} already up to date", shown);
            return Ok(outcome);
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(patched.as_bytes())?;
        tmp.as_file().sync_all()?;

        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }

        tmp.persist(path).map_err(|e| FooterError::Persist {
            path: shown.clone(),
            source: e.error,
        })?;

        debug!("{} rewritten", shown);
        Ok(outcome)
    }

    /// Patches every configured page, continuing past failures.
    pub fn patch_all(&self) -> PatchReport {
        let mut report = PatchReport::default();

        for page in &self.config.pages {
            let path: PathBuf = self.config.root.join(page);
            let result = self.patch_file(&path);
            match &result {
                Ok(PatchOutcome::Replaced) => info!("Updated {}", page),
                Ok(PatchOutcome::Unchanged) => info!("{} already current", page),
                Err(e) => warn!("Error updating {}: {}", page, e),
            }
            report.entries.push((page.clone(), result));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "    <!-- Footer -->\n    <footer class=\"footer\">new</footer>";

    fn patcher() -> FooterPatcher {
        FooterPatcher::new(PatchConfig::new(
            ".",
            vec!["index.html".to_string()],
            TEMPLATE,
        ))
        .unwrap()
    }

    #[test]
    fn test_replaces_single_region_and_keeps_surroundings() {
        let before = "<body>\n<main>hi</main>\n";
        let after = "\n    <script src=\"app.js\"></script>\n</body>\n";
        let page = format!(
            "{}    <!-- Footer -->\n    <footer>\n      old\n    </footer>{}",
            before, after
        );

        let (patched, outcome) = patcher().patch_content("index.html", &page).unwrap();
        assert_eq!(outcome, PatchOutcome::Replaced);
        assert_eq!(patched, format!("{}{}{}", before, TEMPLATE, after));
    }

    #[test]
    fn test_second_pass_is_unchanged() {
        let page = "<body>\n    <!-- Footer -->\n    <footer>old</footer>\n</body>";
        let p = patcher();
        let (once, _) = p.patch_content("index.html", page).unwrap();
        let (twice, outcome) = p.patch_content("index.html", &once).unwrap();
        assert_eq!(outcome, PatchOutcome::Unchanged);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_footer_is_an_error() {
        let result = patcher().patch_content("about.html", "<body><footer>x</footer></body>");
        assert!(matches!(
            result,
            Err(FooterError::FooterNotFound { ref path }) if path == "about.html"
        ));
    }

    #[test]
    fn test_multiple_footers_fail_loudly() {
        let page = "    <!-- Footer -->\n<footer>a</footer>\n<p>between</p>\n    <!-- Footer -->\n<footer>b</footer>";
        let result = patcher().patch_content("index.html", page);
        assert!(matches!(
            result,
            Err(FooterError::MultipleFooters { count: 2, .. })
        ));
    }

    #[test]
    fn test_marker_is_matched_literally() {
        let config = PatchConfig::new(
            ".",
            vec!["index.html".to_string()],
            "<!-- Footer (v2) -->\n<footer>new</footer>",
        )
        .with_marker("<!-- Footer (v2) -->");
        let p = FooterPatcher::new(config).unwrap();

        let page = "<!-- Footer (v2) -->\n<footer>old</footer>";
        let (patched, _) = p.patch_content("index.html", page).unwrap();
        assert_eq!(patched, "<!-- Footer (v2) -->\n<footer>new</footer>");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = FooterPatcher::new(PatchConfig::new(".", vec![], TEMPLATE));
        assert!(matches!(result, Err(FooterError::InvalidConfig(_))));
    }

    #[test]
    fn test_template_must_be_one_whole_region() {
        let config = PatchConfig::new(
            ".",
            vec!["index.html".to_string()],
            "    <!-- Footer -->\n    <footer>a</footer>\n    <footer>b</footer>",
        );
        assert!(matches!(
            FooterPatcher::new(config),
            Err(FooterError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_report_counts() {
        let report = PatchReport {
            entries: vec![
                ("a.html".to_string(), Ok(PatchOutcome::Replaced)),
                ("b.html".to_string(), Ok(PatchOutcome::Unchanged)),
                (
                    "c.html".to_string(),
                    Err(FooterError::FooterNotFound {
                        path: "c.html".to_string(),
                    }),
                ),
            ],
        };
        assert_eq!(report.replaced(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_clean());
    }
}
