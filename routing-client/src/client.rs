use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde::Serialize;
use tracing::instrument;
use tracking_core::{Coordinate, RouteEstimate, RoutingService};

use crate::{Result, RoutingSettings, error::error::FailedRequestSnafu};

#[derive(Debug, Clone)]
pub struct RoutingClient {
    client: ClientWithMiddleware,
    route_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteQuery {
    from_lat: f64,
    from_lon: f64,
    to_lat: f64,
    to_lon: f64,
}

impl RoutingClient {
    pub fn new(settings: &RoutingSettings) -> Result<Self> {
        let inner = Client::builder().timeout(settings.timeout).build()?;

        let client = ClientBuilder::new(inner)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(settings.max_retries),
            ))
            .build();

        Ok(Self {
            client,
            route_url: format!("{}/route", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
        })
    }

    #[instrument(skip(self))]
    pub async fn route(&self, from: Coordinate, to: Coordinate) -> Result<RouteEstimate> {
        let mut request = self.client.get(&self.route_url).query(&RouteQuery {
            from_lat: from.latitude,
            from_lon: from.longitude,
            to_lat: to.latitude,
            to_lon: to.longitude,
        });

        if let Some(api_key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {api_key}"));
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: response.url().to_string(),
                status,
                body: response.text().await?,
            }
            .fail();
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl RoutingService for RoutingClient {
    async fn estimate(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> tracking_core::Result<RouteEstimate> {
        Ok(self.route(from, to).await?)
    }
}
