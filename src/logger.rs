use colored::{self, Colorize};

#[repr(u8)]
#[derive(Clone, Copy)]
enum Severity {
    Fatal = 2,
    Warn = 4,
    Info = 5,
    Verbose = 6,
    Debug = 7,
}

pub trait Logging {
    fn debug(&self, message: &str);
    fn verbose(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn fatal(&self, message: &str);
}

pub struct Logger {
    log_level: u8,
}

impl Logger {
    pub fn new(log_level: u8) -> Self {
        Logger { log_level }
    }
}

impl Logging for Logger {
    fn debug(&self, message: &str) {
        if self.log_level >= Severity::Debug as u8 {
            let log_message = format!("[debug] {message}");
            println!("{}", log_message.truecolor(128, 128, 128))
        }
    }

    fn verbose(&self, message: &str) {
        if self.log_level >= Severity::Verbose as u8 {
            let log_message = format!("[verbose] {message}");
            println!("{}", log_message.truecolor(128, 128, 128))
        }
    }

    fn info(&self, message: &str) {
        if self.log_level >= Severity::Info as u8 {
            let log_message = format!("[info] {message}");
            println!("{}", log_message.green())
        }
    }

    fn warn(&self, message: &str) {
        if self.log_level >= Severity::Warn as u8 {
            let log_message = format!("[warn] {message}");
            println!("{}", log_message.yellow())
        }
    }

    fn fatal(&self, message: &str) {
        if self.log_level >= Severity::Fatal as u8 {
            let log_message = format!("[fatal] {message}");
            println!("{}", log_message.red())
        }
    }
}
