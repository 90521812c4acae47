//! Rolling Logger
//!
//! A `tracing-subscriber` fmt subscriber writing into one file per day,
//! `<app>-YYYY-MM-DD.log`, keeping at most `max_files` of them. The last
//! formatted lines are also kept in memory for display.
//!
//! Records emitted through the `log` facade are bridged into `tracing`.

use chrono::{Local, NaiveDate};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing_subscriber::fmt::MakeWriter;

pub const DEFAULT_MAX_FILES: usize = 7;
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Log files kept on disk, including today's
    pub max_files: usize,
    /// Lines kept for `recent_lines`
    pub buffer_lines: usize,
}

impl LoggerConfig {
    pub fn new(log_dir: PathBuf, app_name: &str) -> Self {
        Self {
            log_dir,
            app_name: app_name.to_string(),
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct State {
    config: LoggerConfig,
    current: Option<(NaiveDate, File)>,
    recent: VecDeque<String>,
    partial: String,
}

/// Writer shared by every formatted event
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<State>>,
}

impl RollingWriter {
    pub fn new(config: LoggerConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.log_dir)?;
        Ok(Self {
            state: Arc::new(Mutex::new(State {
                config,
                current: None,
                recent: VecDeque::new(),
                partial: String::new(),
            })),
        })
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Path of the file used for `date`
    pub fn file_for(&self, date: NaiveDate) -> io::Result<PathBuf> {
        let state = self.lock()?;
        Ok(state.config.log_dir.join(file_name(&state.config.app_name, date)))
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))
    }

    fn write_dated(&self, date: NaiveDate, buf: &[u8]) -> io::Result<()> {
        let mut state = self.lock()?;

        let rotate = !matches!(&state.current, Some((day, _)) if *day == date);
        if rotate {
            let path = state.config.log_dir.join(file_name(&state.config.app_name, date));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            state.current = Some((date, file));
            prune(&state.config)?;
        }
        if let Some((_, file)) = state.current.as_mut() {
            file.write_all(buf)?;
        }

        state.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(end) = state.partial.find('\n') {
            let line: String = state.partial.drain(..=end).collect();
            let capacity = state.config.buffer_lines;
            if capacity == 0 {
                continue;
            }
            if state.recent.len() == capacity {
                state.recent.pop_front();
            }
            state.recent.push_back(line.trim_end().to_string());
        }
        Ok(())
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_dated(Local::now().date_naive(), buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.lock()?;
        match state.current.as_mut() {
            Some((_, file)) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn file_name(app_name: &str, date: NaiveDate) -> String {
    format!("{}-{}.log", app_name, date.format("%Y-%m-%d"))
}

/// Delete the oldest of this app's log files beyond `max_files`
fn prune(config: &LoggerConfig) -> io::Result<()> {
    let prefix = format!("{}-", config.app_name);
    let mut logs: Vec<PathBuf> = fs::read_dir(&config.log_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(&prefix) && name.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    if logs.len() <= config.max_files {
        return Ok(());
    }
    // Dates in the name sort chronologically
    logs.sort();
    let excess = logs.len() - config.max_files;
    for path in logs.into_iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Install the global subscriber with default retention
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_with(LoggerConfig::new(log_dir, app_name))
}

pub fn init_with(config: LoggerConfig) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Err("logger already initialized".to_string());
    }

    let writer = RollingWriter::new(config).map_err(|e| format!("Failed to create log dir: {}", e))?;
    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| e.to_string())?;

    LOGGER
        .set(writer)
        .map_err(|_| "logger already initialized".to_string())
}

pub fn info(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", message);
    Ok(())
}

pub fn error(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Lines kept by the global logger, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|writer| writer.recent_lines()).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    match LOGGER.get() {
        Some(_) => Ok(()),
        None => Err("logger not initialized".to_string()),
    }
}
