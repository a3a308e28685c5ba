use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

use crate::errors::prelude::*;

/// `env_logger` backed logger for the proof builders.
///
/// NOTE: either `pattern` or the `RUST_LOG` environment variable must be set,
/// otherwise every record is filtered out.
pub struct DefaultLogger;

impl DefaultLogger {
    pub fn init(pattern: Option<String>) -> ProofResult<()> {
        let pattern = pattern.or_else(|| env::var("RUST_LOG").ok());

        Builder::new()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{:>5}|{:<30}|{:>35}:{:<4}| {}",
                    record.level(),
                    record.target(),
                    record.file().unwrap_or(""),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .filter(None, LevelFilter::Off)
            .parse_filters(pattern.as_deref().unwrap_or(""))
            .try_init()?;

        Ok(())
    }
}
