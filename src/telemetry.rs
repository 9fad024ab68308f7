use std::io;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::UtcTime},
    prelude::*,
    EnvFilter, Layer,
};

const FORMAT: &str = "ALBUM_MIRROR_LOG_FORMAT";

pub(crate) fn init() -> Result<()> {
    let fmt_env_filter = env_filter_merge_from_environment("info", "ALBUM_MIRROR_LOG_LEVEL")?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    let fmt_layer = match std::env::var(FORMAT).as_deref() {
        Ok("json") => fmt_layer.json().with_filter(fmt_env_filter).boxed(),
        _ => fmt_layer.with_filter(fmt_env_filter).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .context("Failed to set global default tracing subscriber")?;

    Ok(())
}

fn env_filter_merge_from_environment(
    default_directives: &'static str,
    env_var: &'static str,
) -> Result<EnvFilter> {
    let mut filter = EnvFilter::builder()
        .parse(default_directives)
        .with_context(|| anyhow!("Default directives were invalid: {default_directives}"))?;

    if let Ok(env_value) = std::env::var(env_var) {
        for env_directive in env_value.split(',') {
            match env_directive.parse() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(err) => eprintln!("WARN ignoring log directive: {env_directive:?}: {err}"),
            }
        }
    }

    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directives_are_skipped() {
        std::env::set_var("ALBUM_MIRROR_TEST_LOG_LEVEL", "album_mirror=debug,=!=");
        let filter =
            env_filter_merge_from_environment("info", "ALBUM_MIRROR_TEST_LOG_LEVEL").unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("album_mirror=debug"));
        assert!(rendered.contains("info"));
    }
}
