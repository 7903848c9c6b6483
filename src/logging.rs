use std::{
    fs::{self, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Sender};
use once_cell::sync::Lazy;

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("stock_crawl"));

/// 檔案式 logger，寫入動作交由背景執行緒處理，呼叫端不會被 IO 卡住。
pub struct Logger {
    writer: Sender<LogMessage>,
}

impl Logger {
    fn new(log_name: &str) -> Self {
        let log_path = Self::log_path(log_name).unwrap_or_else(|| {
            panic!("Failed to create log directory.");
        });
        let (tx, rx) = unbounded::<LogMessage>();

        thread::spawn(move || {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .unwrap_or_else(|e| panic!("Failed to open log file: {}", e));

            let mut writer = BufWriter::new(file);

            while let Ok(received) = rx.recv() {
                let line = format!(
                    "{} {} {}\n",
                    received.created_at.format("%F %X%.6f"),
                    received.level,
                    received.msg
                );

                if writer.write_all(line.as_bytes()).is_err() || writer.flush().is_err() {
                    error_console(line);
                }
            }
        });

        Logger { writer: tx }
    }

    fn send(&self, level: log::Level, msg: String) {
        if let Err(why) = self.writer.send(LogMessage::new(level, msg)) {
            error_console(why.to_string());
        }
    }

    fn log_path(name: &str) -> Option<PathBuf> {
        let path = Path::new("log");

        if !path.exists() {
            fs::create_dir_all(path).ok()?;
        }

        let mut log_path = PathBuf::from(path);
        log_path.push(format!("{}_{}.log", name, Local::now().format("%Y-%m-%d")));

        Some(log_path)
    }
}

struct LogMessage {
    level: log::Level,
    msg: String,
    created_at: DateTime<Local>,
}

impl LogMessage {
    fn new(level: log::Level, msg: String) -> Self {
        LogMessage {
            level,
            msg,
            created_at: Local::now(),
        }
    }
}

pub fn debug_file_async(log: String) {
    LOGGER.send(log::Level::Debug, log);
}

pub fn info_file_async(log: String) {
    LOGGER.send(log::Level::Info, log);
}

pub fn error_file_async(log: String) {
    LOGGER.send(log::Level::Error, log);
}

pub fn error_console(log: String) {
    println!(
        "{} Error {}",
        Local::now().format("%Y-%m-%d %H:%M:%S.%3f"),
        log
    );
}
