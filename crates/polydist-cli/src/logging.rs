use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

/// Installs the global tracing subscriber for the process.
///
/// Logs go to stderr so the amplitude table on stdout stays clean for
/// piping. An optional log file receives a more detailed, uncolored copy.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&PathBuf>) -> Result<()> {
    let level_filter = if quiet {
        LevelFilter::OFF
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer);

    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(CliError::Io)?;
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true);
            subscriber.with(file_layer).init();
        }
        None => subscriber.init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;
    use tracing::{debug, info, warn};

    static INIT: Once = Once::new();

    fn ensure_global_logger_is_set() {
        INIT.call_once(|| {
            setup_logging(3, false, None).expect("global logger setup failed");
        });
    }

    #[test]
    #[serial]
    fn logging_macros_work_once_initialized() {
        ensure_global_logger_is_set();

        warn!("shell warning");
        info!("shell info");
        debug!("shell debug");
    }

    #[test]
    #[serial]
    fn a_file_layer_captures_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("polydist.log");

        let file = File::create(&log_path).unwrap();
        let file_layer = fmt::layer().with_writer(file).with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(file_layer);

        tracing::subscriber::with_default(subscriber, || {
            debug!("amplitude table written");
        });

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("amplitude table written"));
        assert!(content.contains("DEBUG"));
    }

    #[test]
    #[serial]
    fn unwritable_log_file_propagates_an_io_error() {
        let directory_as_path = PathBuf::from("/");

        if cfg!(unix) && directory_as_path.is_dir() {
            let result = setup_logging(0, false, Some(&directory_as_path));
            assert!(matches!(result, Err(CliError::Io(_))));
        }
    }
}
