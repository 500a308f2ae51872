use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendCount, AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

// -------- level helpers --------
fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || target
            .strip_prefix(crate_name)
            .is_some_and(|rest| rest.starts_with("::"))
}

type CrateFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Everything not claimed by an explicit subsystem section, up to `max_level`.
fn default_filter(claimed: &[String], max_level: Level) -> CrateFilter {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        !claimed.iter().any(|c| matches_crate_prefix(t, c)) && meta.level() <= &max_level
    }))
}

// -------- rotating writer for files --------

enum Rotating {
    Timestamped(FileRotate<AppendTimestamp>),
    Counted(FileRotate<AppendCount>),
}

impl Write for Rotating {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Rotating::Timestamped(f) => f.write(buf),
            Rotating::Counted(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Rotating::Timestamped(f) => f.flush(),
            Rotating::Counted(f) => f.flush(),
        }
    }
}

#[derive(Clone)]
struct RotWriter(Arc<Mutex<Rotating>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log writer poisoned"))?
            .flush()
    }
}

/// A writer that may have no destination (drops writes).
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes records to per-subsystem files by target prefix, else to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_crate_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

// -------- path resolution helpers --------

/// Absolute paths are kept; relative ones are joined onto `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer_at_path(
    log_path: &Path,
    max_bytes: usize,
    max_backups: Option<usize>,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content_limit = ContentLimit::BytesSurpassed(max_bytes);
    let rot = match max_backups {
        Some(n) => Rotating::Counted(FileRotate::new(
            log_path,
            AppendCount::new(n),
            content_limit,
            Compression::None,
            #[cfg(unix)]
            None,
        )),
        None => Rotating::Timestamped(FileRotate::new(
            log_path,
            AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(7))),
            content_limit,
            Compression::None,
            #[cfg(unix)]
            None,
        )),
    };

    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn file_writer_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100).saturating_mul(1024 * 1024);
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(
        &log_path,
        usize::try_from(max_bytes).unwrap_or(usize::MAX),
        section.max_backups,
    ) {
        Ok(writer) => Some(writer),
        Err(e) => {
            // The subscriber is not installed yet.
            eprintln!(
                "Failed to init log file for '{name}': {} ({e})",
                log_path.display()
            );
            None
        }
    }
}

// -------- layer assembly --------

struct Plan<'a> {
    default_section: Option<&'a Section>,
    sections: Vec<(&'a str, &'a Section)>,
    claimed: Vec<String>,
}

fn plan(cfg: &LoggingConfig) -> Plan<'_> {
    let mut sections: Vec<(&str, &Section)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.as_str(), v))
        .collect();
    // Longest prefix first so "routine_db::paging" wins over "routine_db".
    sections.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    Plan {
        default_section: cfg.get("default"),
        claimed: sections.iter().map(|(n, _)| (*n).to_string()).collect(),
        sections,
    }
}

fn console_targets(plan: &Plan<'_>) -> Targets {
    plan.sections
        .iter()
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, s)| {
            match parse_tracing_level(&s.console_level) {
                Some(level) => t.with_target(*name, level),
                None => t.with_target(*name, LevelFilter::OFF),
            }
        })
}

fn file_targets(plan: &Plan<'_>) -> Targets {
    plan.sections
        .iter()
        .filter(|(_, s)| !s.file.trim().is_empty())
        .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, s)| {
            match parse_tracing_level(&s.file_level) {
                Some(level) => t.with_target(*name, level),
                None => t.with_target(*name, LevelFilter::OFF),
            }
        })
}

fn file_router(plan: &Plan<'_>, base_dir: &Path) -> FileRouter {
    FileRouter {
        default: plan
            .default_section
            .and_then(|s| file_writer_for("default", s, base_dir)),
        by_prefix: plan
            .sections
            .iter()
            .filter_map(|(name, s)| {
                file_writer_for(name, s, base_dir).map(|w| ((*name).to_string(), w))
            })
            .collect(),
    }
}

/// Install the global subscriber.
/// - `cfg`: subsystem sections; an empty map installs a plain console logger
/// - `base_dir`: resolves relative log file paths (usually `AppConfig::home_dir`)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` → `tracing` before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let plan = plan(cfg);
    let router = file_router(&plan, base_dir);
    let ansi = std::io::stdout().is_terminal();

    let console = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(&plan));

    let explicit_files = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router.clone())
            .with_filter(file_targets(&plan))
    });

    let default_console = plan
        .default_section
        .and_then(|s| parse_tracing_level(&s.console_level))
        .map(|level| {
            fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(default_filter(&plan.claimed, level))
        });

    let default_file = plan
        .default_section
        .filter(|_| router.default.is_some())
        .and_then(|s| parse_tracing_level(&s.file_level))
        .map(|level| {
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(default_filter(&plan.claimed, level))
        });

    let _ = Registry::default()
        .with(console)
        .with(explicit_files)
        .with(default_console)
        .with(default_file)
        .try_init();
}

// =================== tests ===================
