//! Current conditions through the `OpenWeatherMap` API

use std::fmt::Write;

use async_trait::async_trait;
use parley_config::WeatherToolConfig;
use parley_core::upstream_message;
use parley_llm::{FunctionCall, ToolDeclaration};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use url::Url;

use crate::dispatcher::{Tool, ToolOutput};
use crate::error::ToolError;
use crate::registry::ToolName;

/// Default `OpenWeatherMap` API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const SERVICE: &str = "weather service";
const UNITS: &str = "imperial";

/// `get_weather` tool
pub struct WeatherLookup {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl WeatherLookup {
    /// # Errors
    ///
    /// Returns an error if the default base URL cannot be parsed.
    pub fn new(config: &WeatherToolConfig, api_key: SecretString, client: Client) -> Result<Self, url::ParseError> {
        let base_url = match &config.base_url {
            Some(url) => url.clone(),
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl Tool for WeatherLookup {
    fn declaration(&self) -> ToolDeclaration {
        ToolName::GetWeather.declaration()
    }

    async fn call(&self, call: &FunctionCall) -> Result<ToolOutput, ToolError> {
        let location = call.str_arg("location").ok_or(ToolError::MissingArgument {
            argument: "location",
            hint: "No location was provided. Ask the user which city or location they want the weather for.",
        })?;

        let base = self.base_url.as_str().trim_end_matches('/');
        let response = self
            .client
            .get(format!("{base}/weather"))
            .query(&[
                ("q", location),
                ("appid", self.api_key.expose_secret()),
                ("units", UNITS),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Upstream {
                service: SERVICE,
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Upstream {
                service: SERVICE,
                status: Some(status.as_u16()),
                message: upstream_message(&body),
            });
        }

        let conditions: CurrentConditions = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "unexpected weather response shape");
            ToolError::EmptyPayload("The weather service returned data that could not be read.")
        })?;

        let payload = conditions.into_payload(location);
        let summary = summarize(&payload);

        Ok(ToolOutput {
            summary,
            payload: Some(payload),
            media: None,
        })
    }
}

/// Subset of the `OpenWeatherMap` current weather response
#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    sys: Option<Sys>,
    main: Main,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: u32,
    #[serde(default)]
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

impl CurrentConditions {
    fn into_payload(self, requested: &str) -> Map<String, Value> {
        let label = match (self.name.filter(|n| !n.is_empty()), self.sys.and_then(|s| s.country)) {
            (Some(name), Some(country)) => format!("{name}, {country}"),
            (Some(name), None) => name,
            (None, _) => requested.to_owned(),
        };

        let description = self
            .weather
            .into_iter()
            .next()
            .map_or_else(|| "unknown".to_owned(), |c| c.description);

        let value = json!({
            "location": label,
            "temperature": self.main.temp,
            "feels_like": self.main.feels_like,
            "description": description,
            "humidity": self.main.humidity,
            "pressure": self.main.pressure,
            "wind_speed": self.wind.map(|w| w.speed),
            "units": UNITS,
        });

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn summarize(payload: &Map<String, Value>) -> String {
    let field = |key: &str| payload.get(key).map(ToString::to_string).unwrap_or_default();
    let text = |key: &str| payload.get(key).and_then(Value::as_str).unwrap_or_default().to_owned();

    let mut summary = format!(
        "Current weather in {}: {}°F (feels like {}°F), {}, humidity {}%",
        text("location"),
        field("temperature"),
        field("feels_like"),
        text("description"),
        field("humidity"),
    );

    if let Some(speed) = payload.get("wind_speed").and_then(Value::as_f64) {
        let _ = write!(summary, ", wind {speed} mph");
    }
    summary.push('.');

    summary
}
