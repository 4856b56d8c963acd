use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

/// Largest accepted `chat.max_tool_rounds`
pub const MAX_TOOL_ROUNDS: u8 = 3;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no provider is configured, the default model
    /// cannot be served, the anti-abuse section is missing, or a numeric
    /// setting is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_llm_config()?;
        self.validate_chat_config()?;
        self.validate_anti_abuse_config()?;
        Ok(())
    }

    fn validate_llm_config(&self) -> anyhow::Result<()> {
        if self.llm.providers.is_empty() {
            anyhow::bail!("at least one LLM provider must be configured");
        }

        if self.llm.provider_for_model(&self.chat.default_model).is_none() {
            anyhow::bail!(
                "chat.default_model '{}' is not served by any configured provider",
                self.chat.default_model
            );
        }

        Ok(())
    }

    fn validate_chat_config(&self) -> anyhow::Result<()> {
        let rounds = self.chat.max_tool_rounds;
        if !(1..=MAX_TOOL_ROUNDS).contains(&rounds) {
            anyhow::bail!("chat.max_tool_rounds must be between 1 and {MAX_TOOL_ROUNDS}, got {rounds}");
        }

        if self.chat.system_instruction.trim().is_empty() {
            anyhow::bail!("chat.system_instruction must not be empty");
        }

        Ok(())
    }

    fn validate_anti_abuse_config(&self) -> anyhow::Result<()> {
        let Some(ref gate) = self.anti_abuse else {
            anyhow::bail!("[anti_abuse] must be configured; set `enabled = false` to serve without verification");
        };

        if !gate.enabled {
            return Ok(());
        }

        if gate.secret.as_ref().is_none_or(|secret| secret.expose_secret().trim().is_empty()) {
            anyhow::bail!("anti_abuse.secret must not be empty when the gate is enabled");
        }

        if !(0.0..=1.0).contains(&gate.min_score) {
            anyhow::bail!("anti_abuse.min_score must be between 0.0 and 1.0");
        }

        Ok(())
    }
}
