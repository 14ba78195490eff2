use clap::Parser;
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;

use crate::domain::{ApiFailure, NormalizedError, NotificationSink, SessionInvalidator};
use crate::frameworks::cli::CliRequest;
use crate::frameworks::config::FrontendConfig;
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::forms::FormBinding;
use crate::interface_adapters::notifications::TracingNotificationSink;
use crate::interface_adapters::session::TracingSessionInvalidator;
use crate::use_cases::interceptor::{ErrorInterceptor, HandleOptions};
use crate::use_cases::tooltip::TimedTooltip;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Reports every handled failure as a structured telemetry event.
fn telemetry_handler(error: &NormalizedError) {
    let payload = serde_json::to_string(error).unwrap_or_default();
    tracing::info!(
        target: "telemetry",
        status = ?error.status,
        code = ?error.code,
        %payload,
        "api failure reported."
    );
}

/// Composition root: owns the one interceptor and the client wired to it.
pub struct Frontend {
    pub config: FrontendConfig,
    pub interceptor: Arc<ErrorInterceptor>,
    pub client: ApiClient,
}

impl Frontend {
    pub fn build(
        config: FrontendConfig,
        sink: Arc<dyn NotificationSink>,
        session: Arc<dyn SessionInvalidator>,
    ) -> Result<Self, reqwest::Error> {
        let interceptor =
            Arc::new(ErrorInterceptor::new(sink).with_labels(config.field_labels.clone()));
        interceptor.set_global_error_handler(Arc::new(telemetry_handler));

        let mut client = ApiClient::new(
            config.api_base_url.clone(),
            config.api_timeout,
            Arc::clone(&interceptor),
            session,
        )?;
        if let Some(token) = &config.api_token {
            client = client.with_bearer_token(token.clone());
        }

        tracing::debug!(api_base_url = %config.api_base_url, "api client configured.");
        Ok(Self {
            config,
            interceptor,
            client,
        })
    }

    // Defaults for calls made through this front-end.
    pub fn handle_options(&self) -> HandleOptions {
        HandleOptions::default().with_duration(self.config.toast_duration)
    }

    pub fn bind_form<I, S>(&self, form_id: &str, fields: I) -> FormBinding
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FormBinding::bind(Arc::clone(&self.interceptor), form_id, fields)
    }

    pub fn tooltip_for(&self, form: &FormBinding) -> TimedTooltip {
        TimedTooltip::new(form.registry(), self.config.tooltip_duration)
    }
}

pub async fn run() -> ExitCode {
    // Exits on its own for --help and bad arguments.
    let request = CliRequest::parse();

    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match FrontendConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let frontend = match Frontend::build(
        config,
        Arc::new(TracingNotificationSink),
        Arc::new(TracingSessionInvalidator),
    ) {
        Ok(frontend) => frontend,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    let options = frontend.handle_options();
    let result: Result<Value, ApiFailure> = frontend
        .client
        .send(request.method, &request.path, request.body.as_ref(), &options)
        .await;

    // Failures were already surfaced by the interceptor.
    match result {
        Ok(value) => {
            let rendered =
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            tracing::debug!(error = %failure, "request failed.");
            ExitCode::FAILURE
        }
    }
}
