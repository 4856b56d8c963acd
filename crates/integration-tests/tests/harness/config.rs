//! Configuration builder for integration tests
//!
//! Sections are rendered as TOML and go through the same loader and
//! validation as a configuration file.

use std::fmt::Write;

use parley_config::Config;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    sections: String,
    gate_configured: bool,
}

impl ConfigBuilder {
    /// Create a new builder listening on an ephemeral local port
    pub fn new() -> Self {
        Self {
            sections: "[server]\nlisten_address = \"127.0.0.1:0\"\n".to_owned(),
            gate_configured: false,
        }
    }

    /// Add a Google provider pointed at a mock backend
    pub fn with_google(self, base_url: &str) -> Self {
        self.with_google_key(base_url, "test-key")
    }

    /// Add a Google provider with an explicit API key (may be empty)
    pub fn with_google_key(mut self, base_url: &str, api_key: &str) -> Self {
        let _ = write!(
            self.sections,
            "\n[llm.providers.google]\ntype = \"google\"\napi_key = \"{api_key}\"\nbase_url = \"{base_url}\"\n"
        );
        self
    }

    /// Add a Perplexity provider pointed at a mock backend
    pub fn with_perplexity(mut self, base_url: &str) -> Self {
        let _ = write!(
            self.sections,
            "\n[llm.providers.perplexity]\ntype = \"perplexity\"\napi_key = \"test-key\"\nbase_url = \"{base_url}\"\n"
        );
        self
    }

    /// Enable the image tool against a mock Gemini backend
    pub fn with_image_tool(mut self, base_url: &str) -> Self {
        let _ = write!(
            self.sections,
            "\n[tools.image]\nmodel = \"gemini-image\"\nbase_url = \"{base_url}\"\n"
        );
        self
    }

    /// Enable the weather tool against a mock backend
    pub fn with_weather_tool(mut self, base_url: &str) -> Self {
        let _ = write!(
            self.sections,
            "\n[tools.weather]\napi_key = \"owm-key\"\nbase_url = \"{base_url}\"\n"
        );
        self
    }

    /// Enable the anti-abuse gate against a mock verifier
    pub fn with_anti_abuse(mut self, verify_url: &str, min_score: f64) -> Self {
        let _ = write!(
            self.sections,
            "\n[anti_abuse]\nsecret = \"server-secret\"\nverify_url = \"{verify_url}\"\nmin_score = {min_score:?}\n"
        );
        self.gate_configured = true;
        self
    }

    /// Append raw TOML, e.g. a `[chat]` section
    pub fn with_raw(mut self, toml: &str) -> Self {
        self.sections.push('\n');
        self.sections.push_str(toml);
        self
    }

    /// Disable the health endpoint
    pub fn without_health(self) -> Self {
        self.with_raw("[server.health]\nenabled = false\n")
    }

    /// Build and validate the final config
    ///
    /// The gate is switched off explicitly unless a test enabled it.
    pub fn build(mut self) -> Config {
        if !self.gate_configured {
            self.sections.push_str("\n[anti_abuse]\nenabled = false\n");
        }
        Config::from_toml(&self.sections).expect("test configuration is valid")
    }
}
