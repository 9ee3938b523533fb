//! Wiring between the configuration file and the runtime pieces.

use layerkit_communication::{
    HttpLayoutConfig, HttpLayoutService, LayoutService, SessionOptions, StaticLayoutService,
};
use layerkit_designer::arrangement::{ArrangeResponse, TargetSize};
use layerkit_settings::Config;
use std::path::Path;
use std::sync::Arc;

/// Session options taken from the `[arrangement]` section.
pub fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        spacing: config.arrangement.spacing,
        fallback_canvas: config.arrangement.fallback_canvas(),
        verify_at_commit: config.arrangement.verify_at_commit,
    }
}

/// HTTP client settings taken from the `[layout]` section.
pub fn http_config(config: &Config) -> HttpLayoutConfig {
    HttpLayoutConfig {
        endpoint: config.layout.endpoint.clone(),
        timeout: config.layout.timeout(),
        auth_token: config.layout.auth_token.clone(),
    }
}

/// The layout service to use: a canned response file when given, the
/// configured HTTP endpoint otherwise.
pub fn layout_service(
    config: &Config,
    canned_response: Option<&Path>,
) -> anyhow::Result<Arc<dyn LayoutService>> {
    match canned_response {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let response: ArrangeResponse = serde_json::from_str(&content)?;
            tracing::info!(
                "Using canned layout response {} ({} arrangements)",
                path.display(),
                response.arrangements.len()
            );
            Ok(Arc::new(StaticLayoutService::responding(response)))
        }
        None => Ok(Arc::new(HttpLayoutService::new(http_config(config))?)),
    }
}

/// Resolve the target size from a preset name, explicit dimensions or the
/// configured default, in that order.
pub fn resolve_target(
    config: &Config,
    preset: Option<&str>,
    width: Option<f64>,
    height: Option<f64>,
) -> anyhow::Result<TargetSize> {
    if let Some(name) = preset {
        let preset = config
            .arrangement
            .preset(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown preset: {}", name))?;
        return Ok(preset.size());
    }
    let default = config.arrangement.default_target;
    let target = TargetSize::new(width.unwrap_or(default.width), height.unwrap_or(default.height));
    Ok(target.validate()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target() {
        let config = Config::default();
        assert_eq!(
            resolve_target(&config, Some("Instagram square"), None, None).unwrap(),
            TargetSize::new(1080.0, 1080.0)
        );
        assert_eq!(
            resolve_target(&config, None, Some(-800.0), None).unwrap(),
            TargetSize::new(800.0, 628.0)
        );
        assert!(resolve_target(&config, Some("poster"), None, None).is_err());
        assert!(resolve_target(&config, None, Some(0.0), None).is_err());
    }

    #[test]
    fn test_session_options_follow_config() {
        let mut config = Config::default();
        config.arrangement.verify_at_commit = false;
        config.arrangement.spacing = 40.0;
        let options = session_options(&config);
        assert!(!options.verify_at_commit);
        assert_eq!(options.spacing, 40.0);
        assert_eq!(http_config(&config).endpoint, config.layout.endpoint);
    }
}
