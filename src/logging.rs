use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log to stderr, filtered by `RUST_LOG` plus the `--debug`/`--ddebug` flags.
pub fn setup(debug: bool, ddebug: bool) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = build_filter(rust_log.as_deref(), debug, ddebug);

    let subscriber = tracing_subscriber::registry::Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter),
    );

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// `info` unless `rust_log` says otherwise; the flags add a level on top.
fn build_filter(rust_log: Option<&str>, debug: bool, ddebug: bool) -> EnvFilter {
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(rust_log.unwrap_or_default());

    // ddebug implies debug
    let level = if ddebug {
        Some(LevelFilter::TRACE)
    } else if debug {
        Some(LevelFilter::DEBUG)
    } else {
        None
    };
    if let Some(level) = level {
        env_filter = env_filter.add_directive(Directive::from(level));
    }

    env_filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_info() {
        let filter = build_filter(None, false, false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_rust_log_sets_level() {
        let filter = build_filter(Some("debug"), false, false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_filter(Some("warn"), false, false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_flags_raise_level() {
        let filter = build_filter(Some("warn"), true, false);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_filter(None, true, true);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }
}
