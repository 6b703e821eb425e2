use std::path::Path;

use log::warn;
use log4rs::{
    self,
    append::{ console::{ConsoleAppender, Target}, rolling_file::{ policy::compound::{ roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy, }, RollingFileAppender, }, },
    config::{Appender, Root},
    encode::pattern::PatternEncoder
};

use crate::config::logging::Logging;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l}):5} {t} - {m}{n}";
const FILE_NAME: &str = "spotter.log";

/// Console plus rolling file. Falls back to console only if the file
/// appender cannot be set up.
pub fn init(cnf: &Logging) {
    let (log_cnf, file_error) = match generate_config(cnf) {
        Ok(c) => (c, None),
        Err(file_error) => match console_only(cnf) {
            Ok(c) => (c, Some(file_error)),
            Err(e) => {
                eprintln!("unable to configure logging. {e}");
                return;
            },
        },
    };
    if let Err(e) = log4rs::init_config(log_cnf) {
        eprintln!("unable to initialize logging. {e}");
        return;
    }
    log_panics::init();
    if let Some(e) = file_error {
        warn!("logging to console only. unable to log to {path}. {e}", path = cnf.dir);
    }
}

fn console_appender() -> ConsoleAppender {
    ConsoleAppender::builder()
        .target(Target::Stdout)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build()
}

fn console_only(cnf: &Logging) -> Result<log4rs::Config> {
    let log_cnf = log4rs::Config::builder()
        .appender(Appender::builder().build("console_appender", Box::new(console_appender())))
        .build(Root::builder().appender("console_appender").build(cnf.level))?;
    Ok(log_cnf)
}

fn generate_config(cnf: &Logging) -> Result<log4rs::Config> {
    let dir = Path::new(&cnf.dir);

    let roller = FixedWindowRoller::builder()
        .build(&dir.join("spotter.{}.log").to_string_lossy(), cnf.file_count)?;

    let rolling_file_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(
            dir.join(FILE_NAME),
            Box::new(CompoundPolicy::new(
                Box::new(SizeTrigger::new(cnf.file_size_bytes())),
                Box::new(roller),
            )),
        )?;

    let log_cnf = log4rs::Config::builder()
        .appender(
            Appender::builder().build("rolling_file_appender", Box::new(rolling_file_appender)),
        )
        .appender(Appender::builder().build("console_appender", Box::new(console_appender())))
        .build(
            Root::builder()
                .appender("rolling_file_appender")
                .appender("console_appender")
                .build(cnf.level),
        )?;

    Ok(log_cnf)
}
