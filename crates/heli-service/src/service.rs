//! Request handling and shared application state

use heli_classifier::{annotate, ClassifierChannel};
use heli_core::{AnnotationsResponse, Error, Result, TextRequest};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::params::parse_params;

/// Language identification over the shared classifier channel
#[derive(Clone)]
pub struct LidService {
    channel: ClassifierChannel,
}

impl LidService {
    pub fn new(channel: ClassifierChannel) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &ClassifierChannel {
        &self.channel
    }

    /// Annotate every line of a text request.
    ///
    /// Parameters are checked before the classifier is touched. The channel
    /// stays locked for the whole line sequence, so concurrent requests are
    /// handled one after another.
    pub async fn process(&self, request: TextRequest) -> Result<AnnotationsResponse> {
        if request.kind != "text" {
            return Err(Error::unsupported(request.kind));
        }

        let parsed = parse_params(request.params.as_ref())?;
        debug!(
            include_orig = parsed.options.include_orig,
            language_set = ?parsed.options.language_set,
            "Request parameters validated"
        );

        let start = Instant::now();
        let annotations = {
            let mut session = self.channel.session().await?;
            annotate(&mut session, &request.content, &parsed.options).await?
        };
        let elapsed_us = start.elapsed().as_micros() as u64;

        let response = AnnotationsResponse::new(annotations).with_warnings(parsed.warnings);
        let lines = response.line_count();

        metrics::counter!("heli_lines_total").increment(lines as u64);
        metrics::histogram!("heli_request_latency_us").record(elapsed_us as f64);
        info!(
            lines,
            languages = response.annotations.len(),
            latency_us = elapsed_us,
            "Text annotated"
        );

        Ok(response)
    }
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Request handler
    pub service: LidService,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,

    /// HTTP server settings
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(service: LidService, server: ServerConfig) -> Self {
        Self {
            service,
            metrics_handle: None,
            server: Arc::new(server),
        }
    }

    /// Attach the installed Prometheus recorder
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
