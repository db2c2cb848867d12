use indexmap::IndexMap;
use serde::Deserialize;

/// Build-time environment surface: the bundler injects these as a JSON
/// blob into a global constant; this is the typed re-export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub api_url: String,
    pub port: u16,
    pub ad_publisher_id: Option<String>,
    pub ad_slot_ids: IndexMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001/api".to_string(),
            port: 3000,
            ad_publisher_id: None,
            ad_slot_ids: IndexMap::new(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;

    #[test]
    fn parses_injected_blob() {
        let config = AppConfig::from_json(
            r#"{
                "apiUrl": "https://api.plushies.example",
                "port": 8080,
                "adPublisherId": "pub-123",
                "adSlotIds": {"profileBanner": "slot-1"}
            }"#,
        )
        .expect("config should parse");

        assert_eq!(config.api_url, "https://api.plushies.example");
        assert_eq!(config.port, 8080);
        assert_eq!(config.ad_publisher_id.as_deref(), Some("pub-123"));
        assert_eq!(config.ad_slot_ids.get("profileBanner").map(String::as_str), Some("slot-1"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = AppConfig::from_json("{}").expect("config should parse");
        assert_eq!(config, AppConfig::default());
    }
}
