mod app;
mod assets;
mod controls;

use anyhow::Context;
use brazier_battle::BattleConfig;
use brazier_engine::device::GpuInit;
use brazier_engine::logging::{init_logging, LoggingConfig};
use brazier_engine::window::{Runtime, RuntimeConfig};

use crate::app::{window_title, BattleApp};
use crate::assets::AssetPaths;

/// `brazier-arena [LEVEL]`, level defaults to 1.
fn parse_level(arg: Option<String>) -> anyhow::Result<i32> {
    match arg {
        None => Ok(1),
        Some(s) => s
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid level `{s}`")),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let level = parse_level(std::env::args().nth(1))?;
    let config = BattleConfig::default();
    let tick_period = std::time::Duration::from_secs_f32(config.tick_seconds);
    log::info!("starting at level {level}, boss health {}", config.boss_health(level));

    let app = BattleApp::new(level, config, AssetPaths::from_env());

    Runtime::run(
        RuntimeConfig {
            title: window_title(level, None),
            tick_period: Some(tick_period),
            ..Default::default()
        },
        // Scene colors are authored in display space.
        GpuInit {
            prefer_srgb: false,
            ..Default::default()
        },
        app,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_to_one() {
        assert_eq!(parse_level(None).unwrap(), 1);
    }

    #[test]
    fn level_parses_trimmed_integers() {
        assert_eq!(parse_level(Some(" 4".into())).unwrap(), 4);
        assert_eq!(parse_level(Some("-2".into())).unwrap(), -2);
    }

    #[test]
    fn non_numeric_level_is_an_error() {
        let err = parse_level(Some("boss".into())).unwrap_err();
        assert!(err.to_string().contains("boss"));
    }
}
