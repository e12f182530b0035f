use crate::error::{ChatRankError, Result};
use crate::trend::{DailyPoint, LinearFit};
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_CHART_ENDPOINT: &str = "https://quickchart.io/chart/create";

/// Stand-in for the tick callback, swapped for raw JavaScript after serialization.
const CALLBACK_PLACEHOLDER: &str = "\"CALLBACK\"";

/// A rendered chart specification, ready to post to the chart service.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    payload: String,
}

impl ChartSpec {
    /// Scatter plot of `series` with its trend line.
    ///
    /// The x axis is in days since `start`; the tick callback converts those
    /// offsets back to ISO dates on the client.
    pub fn build(
        user: &str,
        channel: &str,
        start: NaiveDate,
        series: &[DailyPoint],
        fit: &LinearFit,
    ) -> Result<Self> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => (first.day, last.day),
            _ => {
                return Err(ChatRankError::InsufficientData {
                    points: series.len(),
                })
            }
        };

        let points: Vec<_> = series
            .iter()
            .filter(|p| p.count > 0)
            .map(|p| json!({ "x": p.day, "y": p.count }))
            .collect();

        let chart = json!({
            "type": "scatter",
            "data": {
                "datasets": [
                    {
                        "label": "chats",
                        "data": points,
                    },
                    {
                        "label": "trend",
                        "type": "line",
                        "fill": false,
                        "pointRadius": 0,
                        "data": [
                            { "x": first, "y": fit.at(first as f64) },
                            { "x": last, "y": fit.at(last as f64) },
                        ],
                    },
                ],
            },
            "options": {
                "scales": {
                    "xAxes": [{ "ticks": { "callback": "CALLBACK" } }],
                    "yAxes": [{ "ticks": { "beginAtZero": true, "min": 0 } }],
                },
                "title": {
                    "display": true,
                    "text": format!("{}'s chat in twitch.tv/{}", user, channel),
                },
            },
        });

        let payload = chart
            .to_string()
            .replace(CALLBACK_PLACEHOLDER, &tick_callback(start));
        Ok(Self { payload })
    }

    pub fn as_str(&self) -> &str {
        &self.payload
    }
}

fn tick_callback(start: NaiveDate) -> String {
    format!(
        "x=>{{y=new Date('{}');y.setDate(x+y.getDate());return y.toISOString().slice(0,10)}}",
        start.format("%Y-%m-%d")
    )
}

#[derive(Debug, Serialize)]
struct CreateChartRequest<'a> {
    chart: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateChartResponse {
    url: String,
}

/// Turns a chart specification into a shareable image URL.
#[async_trait::async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, chart: &ChartSpec) -> Result<String>;
}

/// Renders charts through the QuickChart create endpoint.
pub struct QuickChartRenderer {
    client: Client,
    endpoint: String,
}

impl QuickChartRenderer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChartRenderer for QuickChartRenderer {
    async fn render(&self, chart: &ChartSpec) -> Result<String> {
        info!("Requesting chart from {}", self.endpoint);
        debug!("Chart payload: {} bytes", chart.as_str().len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&CreateChartRequest {
                chart: chart.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Chart service returned HTTP {}", status);
            return Err(ChatRankError::Chart(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let created: CreateChartResponse = response
            .json()
            .await
            .map_err(|e| ChatRankError::Chart(format!("Failed to parse response: {}", e)))?;

        Ok(created.url)
    }
}
