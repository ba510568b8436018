//! Application configuration. Catalog paths, weighting default, retake tuning.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::entities::WeightMode;
use crate::domain::retake::{DEFAULT_THESIS_BOOST, DEFAULT_TIE_TOLERANCE, RetakeTuning};

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Base data directory (default "./data"). Read from NOTEN_DATA_DIR.
    pub data_dir: Option<String>,

    /// Course catalog JSON file (default "<data_dir>/courses.json"). Read from NOTEN_CATALOG_PATH.
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// SQLite catalog database. Presence selects the SQLite store. Read from NOTEN_CATALOG_DB.
    #[serde(default)]
    pub catalog_db: Option<String>,

    /// Directory for exported overview reports (default "<data_dir>/reports"). Read from NOTEN_REPORTS_DIR.
    #[serde(default)]
    pub reports_dir: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Weighting & Retake Tuning
    // ─────────────────────────────────────────────────────────────────────────
    /// Initial weighting mode: "credits" or "weight" (default). Read from NOTEN_WEIGHT_MODE.
    #[serde(default)]
    pub weight_mode: Option<String>,

    /// Impact-score boost for the thesis course (default 5). Read from NOTEN_THESIS_BOOST.
    #[serde(default)]
    pub thesis_boost: Option<f64>,

    /// Impact-score tie tolerance (default 0.1). Read from NOTEN_TIE_TOLERANCE.
    #[serde(default)]
    pub tie_tolerance: Option<f64>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("NOTEN"));
        if let Ok(path) = std::env::var("NOTEN_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the base data directory. Defaults to "./data" if unset.
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    /// Returns the catalog JSON path. Defaults to "<data_dir>/courses.json".
    pub fn catalog_path_or_default(&self) -> PathBuf {
        self.catalog_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("courses.json"))
    }

    /// Returns the reports directory. Defaults to "<data_dir>/reports".
    pub fn reports_dir_or_default(&self) -> PathBuf {
        self.reports_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("reports"))
    }

    /// Returns the SQLite catalog path if configured. Presence selects the
    /// SQLite store over the JSON file.
    pub fn catalog_db(&self) -> Option<&Path> {
        self.catalog_db.as_deref().map(Path::new)
    }

    /// Returns the initial weighting mode. "credits" selects ECTS credits;
    /// anything else (including unset) selects the course weight value.
    pub fn initial_weight_mode(&self) -> WeightMode {
        match self.weight_mode.as_deref() {
            Some(m) if m.eq_ignore_ascii_case("credits") => WeightMode::Credits,
            _ => WeightMode::CourseWeight,
        }
    }

    /// Returns the retake tuning with config overrides applied.
    pub fn retake_tuning(&self) -> RetakeTuning {
        RetakeTuning {
            thesis_boost: self.thesis_boost.unwrap_or(DEFAULT_THESIS_BOOST),
            tie_tolerance: self.tie_tolerance.unwrap_or(DEFAULT_TIE_TOLERANCE),
        }
    }
}
