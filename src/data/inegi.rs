//! INEGI indicator API integration.
//!
//! One blocking GET per indicator. The response nests observations inside each
//! series; [`parse_response`] flattens that into an [`IndicatorTable`] and is
//! kept free of network access so recorded payloads can be replayed in tests.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::data::IndicatorSource;
use crate::domain::{DataBank, IndicatorRow, IndicatorTable, Period};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://www.inegi.org.mx/app/api/indicadores/desarrolladores/jsonxml";
pub const DEFAULT_LOCALE: &str = "es";
/// National geographic scope.
pub const DEFAULT_GEOGRAPHY: &str = "0700";
const API_VERSION: &str = "2.0";

pub const TOKEN_ENV: &str = "INEGI_TOKEN";
pub const BASE_URL_ENV: &str = "INEGI_API_URL";

const CONNECTION_MESSAGE: &str =
    "proper connection with the API was not established, check the order of the arguments";

pub struct InegiClient {
    client: Client,
    token: String,
    base_url: String,
    locale: String,
    geography: String,
}

impl InegiClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            geography: DEFAULT_GEOGRAPHY.to_string(),
        }
    }

    /// Build a client from `.env` / the environment.
    ///
    /// An explicit token wins over `INEGI_TOKEN`. `INEGI_API_URL` replaces the
    /// default base URL when set.
    pub fn from_env(token: Option<String>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let token = match token {
            Some(token) => token,
            None => std::env::var(TOKEN_ENV).map_err(|_| {
                AppError::config(format!("Missing {TOKEN_ENV} in environment (.env) and no --token given."))
            })?,
        };
        if token.trim().is_empty() {
            return Err(AppError::config("INEGI token is empty."));
        }

        let mut client = Self::new(token.trim());
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            client = client.with_base_url(base_url);
        }
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_geography(mut self, geography: impl Into<String>) -> Self {
        self.geography = geography.into();
        self
    }

    /// Full request URL, token included.
    pub fn request_url(&self, indicator: u64, bank: DataBank, latest: bool) -> String {
        self.url_with_token(indicator, bank, latest, &self.token)
    }

    fn url_with_token(&self, indicator: u64, bank: DataBank, latest: bool, token: &str) -> String {
        format!(
            "{}/INDICATOR/{indicator}/{}/{}/{latest}/{bank}/{API_VERSION}/{token}?type=json",
            self.base_url, self.locale, self.geography,
        )
    }

    /// Fetch one indicator and flatten it.
    ///
    /// `latest = true` asks for the most recent observation only.
    pub fn fetch(&self, indicator: u64, bank: DataBank, latest: bool) -> Result<IndicatorTable, AppError> {
        let url = self.request_url(indicator, bank, latest);
        tracing::debug!(
            url = %self.url_with_token(indicator, bank, latest, "<token>"),
            "requesting indicator"
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::connection(format!("Indicator request failed: {}", e.without_url())))?;

        let status = resp.status();
        tracing::debug!(indicator, %bank, status = status.as_u16(), "indicator response");
        if status != StatusCode::OK {
            return Err(AppError::connection(format!("{CONNECTION_MESSAGE} (HTTP {status}).")));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::connection(format!("Failed to read indicator response: {}", e.without_url())))?;

        let table = parse_response(&body)?;
        tracing::info!(indicator, %bank, latest, rows = table.len(), "fetched indicator");
        Ok(table)
    }

    /// Economic indicator from the BIE bank.
    pub fn economic_info(&self, indicator: u64, latest: bool) -> Result<IndicatorTable, AppError> {
        self.fetch(indicator, DataBank::Bie, latest)
    }

    /// Socio-demographic indicator from the BISE bank.
    pub fn socio_demographic_info(&self, indicator: u64, latest: bool) -> Result<IndicatorTable, AppError> {
        self.fetch(indicator, DataBank::Bise, latest)
    }
}

impl IndicatorSource for InegiClient {
    fn fetch(&self, indicator: u64, bank: DataBank, latest: bool) -> Result<IndicatorTable, AppError> {
        InegiClient::fetch(self, indicator, bank, latest)
    }
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(rename = "Series")]
    series: Option<Vec<SeriesPayload>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct SeriesPayload {
    #[serde(default)]
    indicador: Option<Value>,
    #[serde(default)]
    freq: Option<Value>,
    #[serde(default)]
    topic: Option<Value>,
    #[serde(default)]
    unit: Option<Value>,
    #[serde(default)]
    unit_mult: Option<Value>,
    #[serde(default)]
    note: Option<Value>,
    #[serde(default)]
    source: Option<Value>,
    #[serde(default)]
    lastupdate: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    observations: Option<Vec<ObservationPayload>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ObservationPayload {
    time_period: Value,
    #[serde(default)]
    obs_value: Option<Value>,
    #[serde(default)]
    obs_exception: Option<Value>,
    #[serde(default)]
    obs_status: Option<Value>,
    #[serde(default)]
    obs_source: Option<Value>,
    #[serde(default)]
    obs_note: Option<Value>,
    #[serde(default)]
    cober_geo: Option<Value>,
}

/// Flatten an indicator response body into one row per observation.
///
/// A series without observations contributes no rows.
pub fn parse_response(body: &str) -> Result<IndicatorTable, AppError> {
    let parsed: SeriesResponse = serde_json::from_str(body)
        .map_err(|e| AppError::data(format!("Failed to parse indicator response: {e}")))?;
    let series = parsed
        .series
        .ok_or_else(|| AppError::data("Indicator response has no 'Series' array."))?;

    let mut rows = Vec::new();
    for s in series {
        let indicator = text(s.indicador.as_ref()).unwrap_or_default();
        let freq = text(s.freq.as_ref());
        let topic = text(s.topic.as_ref());
        let unit = text(s.unit.as_ref());
        let unit_mult = text(s.unit_mult.as_ref());
        let note = text(s.note.as_ref());
        let source = text(s.source.as_ref());
        let last_update = text(s.lastupdate.as_ref());
        let status = text(s.status.as_ref());

        for obs in s.observations.unwrap_or_default() {
            let raw_period = text(Some(&obs.time_period)).unwrap_or_default();
            let time_period: Period = raw_period.parse().map_err(|_| {
                AppError::data(format!("Invalid TIME_PERIOD '{raw_period}' for indicator {indicator}."))
            })?;

            rows.push(IndicatorRow {
                indicator: indicator.clone(),
                freq: freq.clone(),
                topic: topic.clone(),
                unit: unit.clone(),
                unit_mult: unit_mult.clone(),
                note: note.clone(),
                source: source.clone(),
                last_update: last_update.clone(),
                status: status.clone(),
                time_period,
                obs_value: obs.obs_value.as_ref().and_then(numeric),
                obs_exception: text(obs.obs_exception.as_ref()),
                obs_status: text(obs.obs_status.as_ref()),
                obs_source: text(obs.obs_source.as_ref()),
                obs_note: text(obs.obs_note.as_ref()),
                cober_geo: text(obs.cober_geo.as_ref()),
            });
        }
    }

    Ok(IndicatorTable::new(rows))
}

/// Scalar JSON value as text; `null` and empty strings become `None`.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Observation values arrive as strings (`"7.8"`), numbers, or blanks.
fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFLATION: &str = include_str!("../../tests/fixtures/inflation_628208.json");

    #[test]
    fn builds_request_url() {
        let client = InegiClient::new("abc-123");
        assert_eq!(
            client.request_url(628208, DataBank::Bie, false),
            "https://www.inegi.org.mx/app/api/indicadores/desarrolladores/jsonxml/INDICATOR/628208/es/0700/false/BIE/2.0/abc-123?type=json"
        );

        let client = InegiClient::new("tok").with_base_url("http://localhost:1234/api/");
        assert_eq!(
            client.request_url(1002000001, DataBank::Bise, true),
            "http://localhost:1234/api/INDICATOR/1002000001/es/0700/true/BISE/2.0/tok?type=json"
        );
    }

    #[test]
    fn request_url_uses_locale_and_geography() {
        let client = InegiClient::new("tok")
            .with_base_url("http://localhost:1234")
            .with_locale("en")
            .with_geography("07000009");
        assert_eq!(
            client.request_url(6200032080, DataBank::Bise, false),
            "http://localhost:1234/INDICATOR/6200032080/en/07000009/false/BISE/2.0/tok?type=json"
        );
    }

    #[test]
    fn flattens_series_observations() {
        let table = parse_response(INFLATION).unwrap();
        assert_eq!(table.len(), 25);

        let first = &table.rows[0];
        assert_eq!(first.indicator, "628208");
        assert_eq!(first.time_period, Period::monthly(2022, 12).unwrap());
        assert_eq!(first.obs_value, Some(7.82));
        assert_eq!(first.cober_geo.as_deref(), Some("0700"));
        assert_eq!(first.last_update.as_deref(), Some("09/01/2023 12:00:00 a. m."));
        assert!(table.rows.iter().all(|r| r.unit == first.unit));
    }

    #[test]
    fn accepts_numeric_and_blank_values() {
        let body = r#"{
            "Series": [{
                "INDICADOR": 1002000001,
                "LASTUPDATE": "",
                "OBSERVATIONS": [
                    {"TIME_PERIOD": "2020", "OBS_VALUE": 126014024},
                    {"TIME_PERIOD": "2015", "OBS_VALUE": ""},
                    {"TIME_PERIOD": "2010", "OBS_VALUE": null}
                ]
            }]
        }"#;
        let table = parse_response(body).unwrap();
        assert_eq!(table.rows[0].indicator, "1002000001");
        assert_eq!(table.rows[0].obs_value, Some(126014024.0));
        assert_eq!(table.rows[1].obs_value, None);
        assert_eq!(table.rows[2].obs_value, None);
        assert_eq!(table.last_update(), None);
    }

    #[test]
    fn series_without_observations_adds_no_rows() {
        let body = r#"{"Series": [{"INDICADOR": "1", "OBSERVATIONS": null}]}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn missing_series_is_a_data_error() {
        let err = parse_response(r#"{"ErrorInfo": "token invalido"}"#).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let err = parse_response("<html>not json</html>").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn bad_time_period_is_a_data_error() {
        let body = r#"{"Series": [{"INDICADOR": "1", "OBSERVATIONS": [{"TIME_PERIOD": "Q3"}]}]}"#;
        let err = parse_response(body).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().contains("Q3"));
    }
}
