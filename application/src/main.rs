use std::{future::IntoFuture as _, io, sync::OnceLock, time};

use application::{api, config, Args, Config};
use axum::{extract::MatchedPath, Extension};
use axum_client_ip::InsecureClientIp;
use futures::{future, TryFutureExt as _};
use service::{
    infra::{postgres, Postgres},
    Service,
};
use tokio::net::TcpListener;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::{MakeSpan, OnResponse, TraceLayer},
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// Levels written to `stderr` rather than `stdout`.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

/// Maximum level of the emitted logs, set once the [`Config`] is loaded.
static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

postgres::embed_migrations!("../migrations");

#[tokio::main]
async fn main() {
    init_tracing();

    _ = start().await;
}

/// Installs the global `tracing` subscriber splitting logs between `stdout`
/// and `stderr` by their level.
fn init_tracing() {
    /// Creates a compact log layer accepting the events of the levels
    /// contained (or not) in the [`STDERR_LEVELS`].
    fn layer<S, W>(
        writer: W,
        stderr: bool,
    ) -> impl tracing_subscriber::Layer<S>
    where
        S: log::Subscriber
            + for<'s> tracing_subscriber::registry::LookupSpan<'s>,
        W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + 'static,
    {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(true)
            .with_thread_names(true)
            .with_writer(writer)
            .with_filter(filter_fn(move |meta| {
                let max = LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO);
                meta.is_span()
                    || STDERR_LEVELS.contains(meta.level()) == stderr
                        && max >= *meta.level()
            }))
    }

    tracing_subscriber::registry()
        .with(layer(io::stdout, false))
        .with(layer(io::stderr, true))
        .init();
}

/// Starts the employee records server along with its background tasks.
async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        service,
        server,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let postgres = Postgres::new(&postgres.into()).map_err(|e| {
        log::error!("failed to initialize `Postgres` client: {e}");
    })?;
    postgres.migrate(&migrations::runner()).await.map_err(|e| {
        log::error!("failed to run database migrations: {e}");
    })?;

    let (service, background) = Service::new(service.into(), postgres);

    let app = api::router()
        .layer(Extension(service))
        .layer(cors(&server.cors)?)
        .layer(http_trace());

    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(addr.as_str()).await.map_err(|e| {
        log::error!("failed to listen on `{addr}`: {e}");
    })?;
    log::info!("listening on `{addr}`");

    future::try_join(
        axum::serve(listener, app)
            .into_future()
            .map_err(|e| log::error!("webserver failed: {e}")),
        background.into_future().map_err(|e| log::error!("background {e}")),
    )
    .await
    .map(drop)
}

/// Creates a [`CorsLayer`] allowing the REST API methods from the configured
/// origins.
fn cors(conf: &config::Cors) -> Result<CorsLayer, ()> {
    conf.origins.iter().try_fold(
        CorsLayer::new()
            .allow_methods([
                http::Method::DELETE,
                http::Method::GET,
                http::Method::OPTIONS,
                http::Method::PATCH,
                http::Method::POST,
            ])
            .allow_headers([http::header::CONTENT_TYPE]),
        |cors, origin| {
            let origin = origin.parse::<http::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not a correct CORS origin: {e}");
            })?;
            Ok(cors.allow_origin(origin))
        },
    )
}

/// Creates a [`TraceLayer`] recording every HTTP request in its own span,
/// completed with the response status code and duration.
fn http_trace() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<axum::body::Body> + Clone,
    tower_http::trace::DefaultOnRequest,
    impl OnResponse<axum::body::Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|r: &http::Request<axum::body::Body>| {
            log::info_span!(
                "HTTP request",
                http.client_ip = InsecureClientIp::from(
                    r.headers(),
                    r.extensions(),
                )
                .map(|ip| ip.0.to_string())
                .ok(),
                http.flavor = ?r.version(),
                http.method = r.method().as_str(),
                http.route = r
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str),
                http.target = r
                    .uri()
                    .path_and_query()
                    .map(http::uri::PathAndQuery::as_str),
                http.user_agent = r
                    .headers()
                    .get(http::header::USER_AGENT)
                    .and_then(|h| h.to_str().ok()),
                http.status_code = log::field::Empty,
            )
        })
        .on_response(
            |r: &http::Response<axum::body::Body>,
             dur: time::Duration,
             span: &log::Span| {
                _ = span.record(
                    "http.status_code",
                    log::field::display(r.status().as_u16()),
                );

                let duration = format!("{}ms", dur.as_millis());
                if r.status().is_server_error() {
                    log::error!(duration = %duration);
                } else if r.status().is_client_error() {
                    log::warn!(duration = %duration);
                } else {
                    log::info!(duration = %duration);
                }
            },
        )
}
