//! Logging and trace export for Parley
//!
//! Console logging goes through `tracing-subscriber`. When an OTLP exporter is
//! configured, spans are also shipped through `tracing-opentelemetry`.

mod metadata;

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use parley_config::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Guard that flushes and shuts down the tracer provider on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are being exported
    pub const fn is_exporting(&self) -> bool {
        self.tracer_provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize logging and optional trace export
///
/// An invalid `log_filter` falls back to `info`. Returns a guard that must be
/// held for the lifetime of the application.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let format = config.map_or(LogFormat::Text, |c| c.log_format);

    let mut guard = TelemetryGuard { tracer_provider: None };

    let otel_layer = match config {
        Some(telemetry_config) if telemetry_config.exporter.is_some() => {
            let tracer_provider = init_tracer(telemetry_config)?;
            let tracer = tracer_provider.tracer("parley");
            global::set_tracer_provider(tracer_provider.clone());
            guard.tracer_provider = Some(tracer_provider);
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(format))
        .with(otel_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(guard)
}

/// Console output layer in the configured format
fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

/// Initialize OTLP trace export
fn init_tracer(config: &TelemetryConfig) -> anyhow::Result<SdkTracerProvider> {
    let exporter_config = config
        .exporter
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no trace exporter configured"))?;

    let exporter = build_span_exporter(exporter_config)?;

    let provider = SdkTracerProvider::builder()
        .with_resource(metadata::build_resource(config))
        .with_sampler(Sampler::ParentBased(Box::new(sampler(config.sampling_rate))))
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

fn sampler(rate: f64) -> Sampler {
    if rate >= 1.0 {
        Sampler::AlwaysOn
    } else if rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(rate)
    }
}

/// Build OTLP span exporter based on protocol
fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}
