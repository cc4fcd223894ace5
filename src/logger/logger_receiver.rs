use super::constants::LOGGER_THREAD_NAME;
use super::logger_error::LoggerError;
use super::logger_sender::LoggerSender;
use std::sync::mpsc::channel;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use std::fs;
use std::fs::File;
use std::io::Write;

use chrono::prelude::*;

/// A logger to log into a file.
///
/// The logger works with channels. It has one channel to receive the information
/// and as many channels to send it. It can be used with multiple threads at the same time.
///
/// To clone the sender's channel it has a new_sender() method which returns a LoggerSender struct.
#[derive(Debug)]
pub struct Logger {
    sender: LoggerSender,
}

impl Logger {
    /// Constructs a new Logger to log.
    ///
    /// In case of success it returns a Logger struct and creates a new log file at the directory path.
    ///
    /// It returns an LoggerError if:
    /// - A new file could not be created at the directory path given
    /// - There was a problem creating a new thread for the logger receiver
    pub fn new(dir_path: &str) -> Result<Self, LoggerError> {
        let (sender, receiver): (Sender<String>, Receiver<String>) = channel();

        let file = Self::create_log_file(dir_path)?;
        Self::spawn_log_receiver(receiver, file)?;

        Ok(Self {
            sender: LoggerSender::new(sender),
        })
    }

    /// Creates a new LoggerSender for the current Logger.
    pub fn new_sender(&self) -> LoggerSender {
        self.sender.clone()
    }

    fn spawn_log_receiver(receiver: Receiver<String>, file: File) -> Result<(), LoggerError> {
        let builder = thread::Builder::new().name(LOGGER_THREAD_NAME.to_string());
        let result = builder.spawn(move || {
            let mut file = file;

            while let Ok(msg) = receiver.recv() {
                let time = Local::now();
                let formatted =
                    format!("{} {}\n", time.format("[%Y/%m/%d %H:%M:%S]"), msg).into_bytes();

                if let Err(err) = file.write_all(&formatted) {
                    eprintln!("Error({err}) writing to the log");
                }
            }
        });
        match result {
            Ok(_) => Ok(()),
            Err(_) => Err(LoggerError::SpawnThreadError),
        }
    }

    fn create_log_file(dir_path: &str) -> Result<File, LoggerError> {
        let time = Local::now();

        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .append(true)
            .open(format!(
                "{}/{}.log",
                dir_path,
                time.format("%Y-%m-%d_%H-%M-%S")
            ));

        match file {
            Ok(file) => Ok(file),
            Err(_) => Err(LoggerError::BadLogPathError(dir_path.to_string())),
        }
    }
}
