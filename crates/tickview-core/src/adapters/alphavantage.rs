use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::{ApiKey, OutputSize, PipelineError, Symbol};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";
const SERIES_KEY: &str = "Time Series (Daily)";
const META_KEY: &str = "Meta Data";
const ERROR_KEY: &str = "Error Message";
const NOTE_KEY: &str = "Note";
const INFORMATION_KEY: &str = "Information";

/// Phrases the provider uses in `Information` notices that are about throttling.
const THROTTLE_MARKERS: [&str; 4] = ["rate limit", "frequency", "requests per", "call volume"];

/// Everything needed for one daily time-series call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeriesRequest {
    pub symbol: Symbol,
    pub api_key: ApiKey,
    pub output_size: OutputSize,
}

impl DailySeriesRequest {
    pub fn new(symbol: Symbol, api_key: ApiKey, output_size: OutputSize) -> Self {
        Self {
            symbol,
            api_key,
            output_size,
        }
    }
}

/// One date's fields exactly as the provider sent them, keyed by provider label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeriesPoint {
    fields: BTreeMap<String, String>,
}

impl RawSeriesPoint {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    fn from_value(value: &Value) -> Self {
        let fields = value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(label, value)| {
                        let text = match value {
                            Value::String(text) => text.clone(),
                            Value::Number(number) => number.to_string(),
                            _ => return None,
                        };
                        Some((label.clone(), text))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for RawSeriesPoint
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(label, value)| (label.into(), value.into()))
                .collect(),
        }
    }
}

/// Provider date keys mapped to raw points, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeries {
    points: BTreeMap<String, RawSeriesPoint>,
}

impl RawSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<&RawSeriesPoint> {
        self.points.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawSeriesPoint)> {
        self.points
            .iter()
            .map(|(date, point)| (date.as_str(), point))
    }
}

impl<K: Into<String>> FromIterator<(K, RawSeriesPoint)> for RawSeries {
    fn from_iter<I: IntoIterator<Item = (K, RawSeriesPoint)>>(iter: I) -> Self {
        Self {
            points: iter
                .into_iter()
                .map(|(date, point)| (date.into(), point))
                .collect(),
        }
    }
}

/// Informational `Meta Data` block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesMetadata {
    pub information: Option<String>,
    pub symbol: Option<String>,
    pub last_refreshed: Option<String>,
    pub output_size: Option<String>,
    pub time_zone: Option<String>,
}

impl SeriesMetadata {
    fn from_object(object: &Map<String, Value>) -> Self {
        // keys look like "3. Last Refreshed"; match on the label after the ordinal
        let lookup = |label: &str| {
            object.iter().find_map(|(key, value)| {
                let name = key.split_once(". ").map_or(key.as_str(), |(_, name)| name);
                if name.eq_ignore_ascii_case(label) {
                    value.as_str().map(str::to_owned)
                } else {
                    None
                }
            })
        };

        Self {
            information: lookup("Information"),
            symbol: lookup("Symbol"),
            last_refreshed: lookup("Last Refreshed"),
            output_size: lookup("Output Size"),
            time_zone: lookup("Time Zone"),
        }
    }
}

/// Successful fetch result: the raw series plus whatever metadata came with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeriesPayload {
    pub series: RawSeries,
    pub metadata: Option<SeriesMetadata>,
}

/// Fetcher for the Alpha Vantage daily time-series endpoint.
#[derive(Clone)]
pub struct AlphaVantageClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for AlphaVantageClient {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl AlphaVantageClient {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Issue the request and classify the provider envelope.
    pub async fn fetch_daily(
        &self,
        req: &DailySeriesRequest,
    ) -> Result<DailySeriesPayload, PipelineError> {
        let request = HttpRequest::get(self.daily_url(req, req.api_key.expose()))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        tracing::info!(
            symbol = %req.symbol,
            output_size = %req.output_size,
            url = %self.daily_url(req, "redacted"),
            "requesting daily series"
        );

        let started = Instant::now();
        let response = tokio::time::timeout(request.timeout(), self.http_client.execute(request))
            .await
            .map_err(|_| {
                PipelineError::network(format!(
                    "alphavantage request timed out after {}ms",
                    self.timeout_ms
                ))
            })??;

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "alphavantage responded"
        );

        if !response.is_success() {
            return Err(PipelineError::network(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        parse_daily_response(&response.body)
    }

    /// Like [`Self::fetch_daily`], but gives up with `Cancelled` once `cancel` resolves.
    pub async fn fetch_daily_until<F>(
        &self,
        req: &DailySeriesRequest,
        cancel: F,
    ) -> Result<DailySeriesPayload, PipelineError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::warn!(symbol = %req.symbol, "daily series fetch cancelled");
                Err(PipelineError::cancelled())
            }
            result = self.fetch_daily(req) => result,
        }
    }

    fn daily_url(&self, req: &DailySeriesRequest, api_key: &str) -> String {
        format!(
            "{}/query?function={DAILY_FUNCTION}&symbol={}&outputsize={}&apikey={}",
            self.base_url,
            urlencoding::encode(req.symbol.as_str()),
            req.output_size.as_str(),
            urlencoding::encode(api_key)
        )
    }
}

/// Classify a daily time-series body.
///
/// Checks run in a fixed order: JSON shape, provider error, throttling notice,
/// then presence of the series object. A throttling notice never falls through
/// to the missing-series check.
pub fn parse_daily_response(body: &str) -> Result<DailySeriesPayload, PipelineError> {
    let parsed: Value = serde_json::from_str(body).map_err(|e| {
        PipelineError::malformed_response(format!("failed to parse alphavantage response: {e}"))
    })?;

    let Value::Object(envelope) = parsed else {
        return Err(PipelineError::malformed_response(
            "alphavantage response is not a JSON object",
        ));
    };

    if let Some(message) = envelope.get(ERROR_KEY) {
        return Err(PipelineError::provider(notice_text(ERROR_KEY, message)));
    }

    if let Some(message) = envelope.get(NOTE_KEY) {
        let message = notice_text(NOTE_KEY, message);
        tracing::warn!(note = %message, "alphavantage throttling notice");
        return Err(PipelineError::rate_limited(message));
    }

    if let Some(message) = envelope.get(INFORMATION_KEY) {
        let message = notice_text(INFORMATION_KEY, message);
        let lowered = message.to_ascii_lowercase();
        if THROTTLE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            tracing::warn!(information = %message, "alphavantage throttling notice");
            return Err(PipelineError::rate_limited(message));
        }
        return Err(PipelineError::provider(message));
    }

    let Some(Value::Object(series)) = envelope.get(SERIES_KEY) else {
        return Err(PipelineError::malformed_response("missing time series"));
    };

    let series = series
        .iter()
        .map(|(date, point)| (date.clone(), RawSeriesPoint::from_value(point)))
        .collect::<RawSeries>();

    let metadata = envelope
        .get(META_KEY)
        .and_then(Value::as_object)
        .map(SeriesMetadata::from_object);

    Ok(DailySeriesPayload { series, metadata })
}

/// Provider text for a notice key, or a stand-in naming the key when it is blank.
fn notice_text(key: &str, value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    if text.is_empty() {
        format!("alphavantage returned an empty '{key}' notice")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::CannedHttpClient;
    use crate::PipelineErrorKind;

    fn request() -> DailySeriesRequest {
        DailySeriesRequest::new(
            Symbol::parse("BRK-B").expect("valid symbol"),
            ApiKey::new("key with space").expect("valid key"),
            OutputSize::Compact,
        )
    }

    #[tokio::test]
    async fn builds_daily_query_with_encoded_parameters() {
        let client = Arc::new(CannedHttpClient::ok_json(
            r#"{"Time Series (Daily)": {}}"#,
        ));
        let fetcher = AlphaVantageClient::with_http_client(client.clone())
            .with_base_url("https://av.example.test/")
            .with_timeout_ms(1_500);

        fetcher.fetch_daily(&request()).await.expect("empty series is still a success");

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://av.example.test/query?function=TIME_SERIES_DAILY&symbol=BRK-B&outputsize=compact&apikey=key%20with%20space"
        );
        assert_eq!(requests[0].timeout_ms, 1_500);
    }

    #[test]
    fn keeps_raw_fields_and_stringifies_numbers() {
        let payload = parse_daily_response(
            r#"{"Time Series (Daily)": {"2024-01-02": {"1. open": "10.5", "5. volume": 1200, "x": null}}}"#,
        )
        .expect("valid payload");

        let point = payload.series.get("2024-01-02").expect("point present");
        assert_eq!(point.get("1. open"), Some("10.5"));
        assert_eq!(point.get("5. volume"), Some("1200"));
        assert_eq!(point.get("x"), None);
        assert!(payload.metadata.is_none());
    }

    #[test]
    fn reads_metadata_block() {
        let payload = parse_daily_response(
            r#"{
                "Meta Data": {
                    "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                    "2. Symbol": "IBM",
                    "3. Last Refreshed": "2024-01-10",
                    "4. Output Size": "Compact",
                    "5. Time Zone": "US/Eastern"
                },
                "Time Series (Daily)": {}
            }"#,
        )
        .expect("valid payload");

        let metadata = payload.metadata.expect("metadata present");
        assert_eq!(metadata.symbol.as_deref(), Some("IBM"));
        assert_eq!(metadata.last_refreshed.as_deref(), Some("2024-01-10"));
        assert_eq!(metadata.time_zone.as_deref(), Some("US/Eastern"));
    }

    #[test]
    fn error_message_wins_over_note() {
        let err = parse_daily_response(
            r#"{"Error Message": "Invalid API call", "Note": "slow down"}"#,
        )
        .expect_err("must fail");
        assert_eq!(err.kind(), PipelineErrorKind::Provider);
        assert_eq!(err.message(), "Invalid API call");
    }

    #[test]
    fn information_notice_is_split_by_content() {
        let throttled = parse_daily_response(
            r#"{"Information": "Our standard API rate limit is 25 requests per day."}"#,
        )
        .expect_err("must fail");
        assert_eq!(throttled.kind(), PipelineErrorKind::RateLimited);

        let premium = parse_daily_response(r#"{"Information": "This is a premium endpoint."}"#)
            .expect_err("must fail");
        assert_eq!(premium.kind(), PipelineErrorKind::Provider);
    }

    #[test]
    fn non_object_bodies_are_malformed() {
        let err = parse_daily_response("[1, 2, 3]").expect_err("must fail");
        assert_eq!(err.kind(), PipelineErrorKind::MalformedResponse);

        let err =
            parse_daily_response(r#"{"Time Series (Daily)": "soon"}"#).expect_err("must fail");
        assert_eq!(err.message(), "missing time series");
    }

    #[test]
    fn blank_notices_keep_their_kind_and_get_a_message() {
        let cases = [
            (r#"{"Error Message": ""}"#, PipelineErrorKind::Provider, "Error Message"),
            (r#"{"Note": "   "}"#, PipelineErrorKind::RateLimited, "Note"),
            (r#"{"Information": null}"#, PipelineErrorKind::Provider, "Information"),
        ];

        for (body, kind, key) in cases {
            let err = parse_daily_response(body).expect_err("must fail");
            assert_eq!(err.kind(), kind, "{body}");
            assert_eq!(
                err.message(),
                format!("alphavantage returned an empty '{key}' notice")
            );
        }
    }
}
