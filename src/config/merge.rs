//! Partial overrides
//!
//! Setting a nested option from a mapping merges into the existing child:
//! - Mappings: merge by key (recursive)
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)
//! - Null: override (stores an explicit absent value)

use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use super::name::OptionName;
use super::node::Configuration;
use crate::error::{ConfigError, Result};

impl Configuration {
    /// Merge `map` into the nested node at `name`. Keys not named in `map`
    /// keep their current value or default.
    pub(crate) fn merge_mapping(&mut self, name: OptionName, map: Map<String, Json>) {
        debug!(option = %name, keys = map.len(), "applying partial override");
        self.node_mut(name).apply_partial(map);
    }

    /// Set every entry of `map` on this node.
    ///
    /// Keys that normalise to an empty name (`""`, `":"`) are skipped.
    pub fn apply_partial(&mut self, map: Map<String, Json>) {
        for (key, value) in map {
            match OptionName::parse(&key) {
                Ok(name) => self.set(name, value),
                Err(_) => {
                    warn!(key = %key, "skipping override with an empty option name");
                }
            }
        }
    }

    /// Apply override layers in order (first is lowest precedence).
    ///
    /// `null` layers are skipped; any other non-object layer is rejected
    /// before anything is applied.
    pub fn apply_layers(&mut self, layers: Vec<Json>) -> Result<()> {
        if let Some(index) = layers
            .iter()
            .position(|layer| !layer.is_object() && !layer.is_null())
        {
            return Err(ConfigError::InvalidLayer { index });
        }
        for layer in layers {
            if let Json::Object(map) = layer {
                self.apply_partial(map);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encoder() -> Configuration {
        Configuration::from_defaults(
            json!({
                "keyframe_interval": 250,
                "profiles": ["baseline", "main", "high"],
                "audio": {
                    "codec": "aac",
                    "channels": 2
                }
            })
            .as_object()
            .cloned()
            .unwrap(),
        )
    }

    #[test]
    fn test_scalar_override() {
        let mut config = encoder();
        config.apply_partial(json!({"keyframe_interval": 60}).as_object().cloned().unwrap());
        assert_eq!(config.get_u64("keyframe_interval").unwrap(), Some(60));
    }

    #[test]
    fn test_object_deep_merge() {
        let mut config = encoder();
        config.set("audio", json!({"codec": "opus"}));

        // codec should be overridden
        assert_eq!(config.get_str("audio.codec").unwrap().as_deref(), Some("opus"));
        // channels should be preserved
        assert_eq!(config.get_u64("audio.channels").unwrap(), Some(2));
    }

    #[test]
    fn test_array_replace() {
        let mut config = encoder();
        config.set("profiles", json!(["main"]));
        assert_eq!(config.get("profiles").unwrap(), json!(["main"]));
    }

    #[test]
    fn test_null_override() {
        let mut config = encoder();
        config.set("audio", json!({"channels": null}));

        assert!(config.get_path("audio.channels").unwrap().is_absent());
        assert_eq!(config.get_str("audio.codec").unwrap().as_deref(), Some("aac"));
    }

    #[test]
    fn test_nested_deep_merge() {
        let mut config = Configuration::from_defaults(
            json!({"video": {"scaling": {"width": 1920, "height": 1080}}})
                .as_object()
                .cloned()
                .unwrap(),
        );
        config.set("video", json!({"scaling": {"height": 720, "filter": "lanczos"}}));

        assert_eq!(config.get_u64("video.scaling.width").unwrap(), Some(1920));
        assert_eq!(config.get_u64("video.scaling.height").unwrap(), Some(720));
        assert_eq!(config.get_str("video.scaling.filter").unwrap().as_deref(), Some("lanczos"));
    }

    #[test]
    fn test_empty_keys_are_skipped() {
        let mut config = encoder();
        config.apply_partial(
            json!({"": 1, ":": 2, "keyframe_interval": 30})
                .as_object()
                .cloned()
                .unwrap(),
        );

        assert_eq!(config.get_u64("keyframe_interval").unwrap(), Some(30));
        assert!(!config.keys().iter().any(|name| name.as_str().is_empty()));

        let built = Configuration::from_values(json!({"": 1}).as_object().cloned().unwrap());
        assert!(built.keys().is_empty());
    }

    #[test]
    fn test_apply_layers() {
        let mut config = encoder();
        config
            .apply_layers(vec![
                json!({"keyframe_interval": 120}),
                Json::Null,
                json!({"audio": {"codec": "opus"}}),
                json!({"keyframe_interval": 48}),
            ])
            .unwrap();

        // Last layer wins for keyframe_interval
        assert_eq!(config.get_u64("keyframe_interval").unwrap(), Some(48));
        assert_eq!(config.get_str("audio.codec").unwrap().as_deref(), Some("opus"));
        assert_eq!(config.get_u64("audio.channels").unwrap(), Some(2));
    }

    #[test]
    fn test_apply_layers_rejects_scalars() {
        let mut config = encoder();
        let err = config
            .apply_layers(vec![json!({"keyframe_interval": 1}), json!(5)])
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidLayer { index: 1 }));
        // Nothing was applied.
        assert_eq!(config.get_u64("keyframe_interval").unwrap(), Some(250));
    }
}
