use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

const DEFAULT_MAX_HANDS: u32 = 100;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";
const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Engine and harness targets the structured log listens to.
pub const GAME_TARGET: &str = "spades_core::game";
pub const HAND_TARGET: &str = "spades_core::hand";
pub const BENCH_TARGET: &str = "spades_bench";

/// Root self-play configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load and validate a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(source) => return Err(ConfigError::Read { source, path }),
        };
        let mut cfg: BenchmarkConfig = match serde_yaml::from_str(&text) {
            Ok(cfg) => cfg,
            Err(source) => return Err(ConfigError::Parse { source, path }),
        };
        if let Err(source) = cfg.validate() {
            return Err(ConfigError::Invalid { path, source });
        }
        Ok(cfg)
    }

    /// Checks every section and fills logging defaults. No I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.validate()
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        self.outputs.resolve(&self.run_id)
    }
}

/// How many games to play and how they are seeded.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    /// Games still undecided after this many hands are recorded as unfinished.
    #[serde(default = "default_max_hands")]
    pub max_hands: u32,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::field(
                "games.count",
                "number of games must be greater than zero",
            ));
        }
        if self.max_hands == 0 {
            return Err(ValidationError::field(
                "games.max_hands",
                "max_hands must be at least 1",
            ));
        }
        Ok(())
    }
}

fn default_max_hands() -> u32 {
    DEFAULT_MAX_HANDS
}

/// Output paths. Each may contain `{run_id}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    /// One row per game.
    pub jsonl: String,
    pub summary_md: String,
    /// Structured log; defaults to `telemetry.jsonl` beside the summary.
    #[serde(default)]
    pub telemetry: Option<String>,
}

impl OutputsConfig {
    fn resolve(&self, run_id: &str) -> ResolvedOutputs {
        let summary_md = resolve_template(run_id, &self.summary_md);
        let telemetry = match &self.telemetry {
            Some(template) => resolve_template(run_id, template),
            None => summary_md
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(TELEMETRY_FILE),
        };
        ResolvedOutputs {
            jsonl: resolve_template(run_id, &self.jsonl),
            summary_md,
            telemetry,
        }
    }

    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let named = [
            ("outputs.jsonl", Some(&self.jsonl)),
            ("outputs.summary_md", Some(&self.summary_md)),
            ("outputs.telemetry", self.telemetry.as_ref()),
        ];
        for (field, template) in named {
            if template.is_some_and(|t| t.trim().is_empty()) {
                return Err(ValidationError::field(field, "path must not be empty"));
            }
        }

        let resolved = self.resolve(run_id);
        if resolved.jsonl == resolved.summary_md {
            return Err(ValidationError::field(
                "outputs.summary_md",
                "summary would overwrite the game rows",
            ));
        }
        if resolved.telemetry == resolved.jsonl || resolved.telemetry == resolved.summary_md {
            return Err(ValidationError::field(
                "outputs.telemetry",
                "telemetry log must not share a path with other outputs",
            ));
        }
        Ok(())
    }
}

/// Structured logging is off unless `enable_structured` is set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Record every trick resolution, not only hand and game results.
    #[serde(default)]
    pub trick_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            trick_events: false,
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::field(
                "logging.tracing_level",
                format!("unknown level '{}'", self.tracing_level),
            ));
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        Level::from_str(self.tracing_level.trim()).ok()
    }

    /// `EnvFilter` directives: engine and harness targets at the configured
    /// level, trick resolution at DEBUG when `trick_events` is set, and
    /// everything else at WARN.
    pub fn filter_directives(&self) -> String {
        let level = self.level().unwrap_or(Level::INFO);
        let hand = if self.trick_events {
            Level::DEBUG.max(level)
        } else {
            level
        };
        format!(
            "warn,{GAME_TARGET}={game},{HAND_TARGET}={hand},{BENCH_TARGET}={game}",
            game = level.as_str().to_ascii_lowercase(),
            hand = hand.as_str().to_ascii_lowercase(),
        )
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::field("run_id", "run_id must not be empty"));
    }
    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::field(
            "run_id",
            "run_id may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Output paths with `{run_id}` substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
    pub telemetry: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ValidationError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "selfplay_smoke"
games:
  seed: 123
  count: 16
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn parse(yaml: &str) -> BenchmarkConfig {
        serde_yaml::from_str(yaml).expect("parse yaml")
    }

    fn failing_field(yaml: &str) -> String {
        let mut cfg = parse(yaml);
        match cfg.validate().expect_err("validation fails") {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = parse(BASIC_YAML);
        cfg.validate().expect("validate");

        assert_eq!(cfg.games.max_hands, DEFAULT_MAX_HANDS);
        assert_eq!(cfg.games.seed, Some(123));
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/selfplay_smoke/games.jsonl")
        );
        assert_eq!(
            outputs.telemetry,
            PathBuf::from("bench/out/selfplay_smoke/telemetry.jsonl")
        );
    }

    #[test]
    fn explicit_telemetry_path_is_templated() {
        let yaml = BASIC_YAML.replace(
            "  summary_md: \"bench/out/{run_id}/summary.md\"",
            "  summary_md: \"bench/out/{run_id}/summary.md\"\n  telemetry: \"logs/{run_id}.jsonl\"",
        );
        let mut cfg = parse(&yaml);
        cfg.validate().expect("validate");
        assert_eq!(
            cfg.resolved_outputs().telemetry,
            PathBuf::from("logs/selfplay_smoke.jsonl")
        );
    }

    #[test]
    fn rejects_bad_sections_by_field() {
        assert_eq!(
            failing_field(&BASIC_YAML.replace("count: 16", "count: 0")),
            "games.count"
        );
        assert_eq!(
            failing_field(&BASIC_YAML.replace("selfplay_smoke", "self play")),
            "run_id"
        );
        assert_eq!(
            failing_field(&BASIC_YAML.replace("summary.md", "games.jsonl")),
            "outputs.summary_md"
        );
        assert_eq!(
            failing_field(&BASIC_YAML.replace("\"debug\"", "\"chatty\"")),
            "logging.tracing_level"
        );
    }

    #[test]
    fn empty_tracing_level_falls_back_to_info() {
        let mut cfg = parse(&BASIC_YAML.replace("\"debug\"", "\" \""));
        cfg.validate().expect("valid");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }

    #[test]
    fn filter_covers_engine_and_harness_targets() {
        let mut logging = LoggingConfig::default();
        assert_eq!(
            logging.filter_directives(),
            "warn,spades_core::game=info,spades_core::hand=info,spades_bench=info"
        );

        logging.trick_events = true;
        assert!(
            logging
                .filter_directives()
                .contains("spades_core::hand=debug")
        );

        logging.tracing_level = "trace".to_string();
        assert!(
            logging
                .filter_directives()
                .contains("spades_core::hand=trace")
        );
    }

    #[test]
    fn from_path_reports_the_offending_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.yaml");
        fs::write(&path, BASIC_YAML.replace("count: 16", "count: 0")).expect("write");

        let err = BenchmarkConfig::from_path(&path).expect_err("invalid config");
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.path(), path.as_path());

        let missing = dir.path().join("missing.yaml");
        let err = BenchmarkConfig::from_path(&missing).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
