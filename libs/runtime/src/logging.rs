use crate::config::{LoggingConfig, Section};
use parking_lot::Mutex;
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, fmt};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 5;

/// "off"/"none" disable a sink; unknown strings fall back to info.
fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// True if `target` is `prefix` itself or lives under `prefix::`.
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

// -------- rotating file sink --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

/// Writer that discards everything; used for targets without a file.
struct Discard;

impl Write for Discard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Picks the rotating file for a record by its target prefix,
/// falling back to the "default" section's file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn resolve(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_prefix(target, prefix))
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = Box<dyn Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.default {
            Some(file) => Box::new(file.clone()),
            None => Box::new(Discard),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        match self.resolve(meta.target()) {
            Some(file) => Box::new(file),
            None => Box::new(Discard),
        }
    }
}

/// Relative log paths live under `base_dir` (the server home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(section: &Section, base_dir: &Path) -> std::io::Result<RotatingFile> {
    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(backups)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn open_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    match open_rotating(section, base_dir) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!(
                "Failed to open log file '{}' for '{}': {}",
                section.file, name, e
            );
            None
        }
    }
}

/// Console and file filters derived from the config.
/// Explicit subsystem sections override the "default" section.
struct Plan {
    console: Targets,
    file: Targets,
    router: FileRouter,
}

fn build_plan(cfg: &LoggingConfig, base_dir: &Path) -> Plan {
    let default_section = cfg.get("default");

    let mut console = Targets::new().with_default(
        default_section
            .map(|s| parse_level(&s.console_level))
            .unwrap_or(LevelFilter::OFF),
    );

    let mut router = FileRouter {
        default: default_section.and_then(|s| open_for("default", s, base_dir)),
        by_prefix: Vec::new(),
    };

    let default_file_level = match (default_section, router.default.is_some()) {
        (Some(s), true) => parse_level(&s.file_level),
        _ => LevelFilter::OFF,
    };
    let mut file = Targets::new().with_default(default_file_level);

    let mut sections: Vec<(&String, &Section)> =
        cfg.iter().filter(|(k, _)| k.as_str() != "default").collect();
    // longest prefix first so nested subsystems win over their parents
    sections.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    for (name, section) in sections {
        console = console.with_target(name.clone(), parse_level(&section.console_level));

        match open_for(name, section, base_dir) {
            Some(writer) => {
                router.by_prefix.push((name.clone(), writer));
                file = file.with_target(name.clone(), parse_level(&section.file_level));
            }
            None => {
                // no own file: the subsystem does not leak into the default file
                file = file.with_target(name.clone(), LevelFilter::OFF);
            }
        }
    }

    Plan {
        console,
        file,
        router,
    }
}

/// Initialize global logging from config.
///
/// `base_dir` resolves relative log file paths (usually `server.home_dir`).
/// Console output is human readable; file output is JSON.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` records (sqlx, sea-orm) before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let plan = build_plan(cfg, base_dir);

    let console_layer = fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console);

    if plan.router.is_empty() {
        let _ = Registry::default().with(console_layer).try_init();
        return;
    }

    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(plan.router)
        .with_filter(plan.file);

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Returns the per-subsystem sections ordered by name; handy for diagnostics.
pub fn describe(cfg: &LoggingConfig) -> Vec<(String, String, String)> {
    let mut rows: Vec<_> = cfg
        .iter()
        .map(|(name, s)| (name.clone(), s.console_level.clone(), s.file.clone()))
        .collect();
    rows.sort();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(parse_level("trace"), LevelFilter::TRACE);
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("Info"), LevelFilter::INFO);
        assert_eq!(parse_level("warn"), LevelFilter::WARN);
        assert_eq!(parse_level("ERROR"), LevelFilter::ERROR);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("none"), LevelFilter::OFF);
        assert_eq!(parse_level("bogus"), LevelFilter::INFO);
    }

    #[test]
    fn test_prefix_matching() {
        assert!(matches_prefix("patient_intake", "patient_intake"));
        assert!(matches_prefix("patient_intake::domain", "patient_intake"));
        assert!(!matches_prefix("patient_intake_extra", "patient_intake"));
        assert!(!matches_prefix("api_ingress", "patient_intake"));
    }

    #[test]
    fn test_relative_log_path_is_under_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));
    }

    #[test]
    fn test_open_rotating_creates_parent() {
        let tmp = tempdir().unwrap();
        let s = section("info", "nested/dir/app.log", "debug");
        assert!(open_rotating(&s, tmp.path()).is_ok());
        assert!(tmp.path().join("nested/dir").is_dir());
    }

    #[test]
    fn test_plan_routes_subsystems_to_their_files() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert(
            "patient_intake".into(),
            section("debug", "logs/intake_module.log", "trace"),
        );
        cfg.insert("api_ingress".into(), section("warn", "", "debug"));

        let plan = build_plan(&cfg, tmp.path());

        assert!(plan.router.default.is_some());
        assert_eq!(plan.router.by_prefix.len(), 1);
        assert!(plan.router.resolve("patient_intake::domain::service").is_some());
        assert!(plan.router.resolve("sqlx::query").is_some(), "falls back to default");
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn test_plan_without_files_has_empty_router() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", "", "debug"));

        let plan = build_plan(&cfg, tmp.path());
        assert!(plan.router.is_empty());
    }

    #[test]
    fn test_describe_is_sorted() {
        let mut cfg = default_logging_config();
        cfg.insert("api_ingress".into(), section("warn", "", ""));
        let rows = describe(&cfg);
        assert_eq!(rows[0].0, "api_ingress");
        assert_eq!(rows[1].0, "default");
    }
}
