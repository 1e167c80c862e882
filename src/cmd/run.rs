//! `waypoint run` — start the gateway server.
//!
//! Loads configuration from a file source, compiles the route table,
//! and starts the Axum HTTP server with graceful shutdown. The config
//! is read exactly once: the table is immutable for the process
//! lifetime, so there is no reload loop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cli::RunArgs;
use crate::config::sources;
use crate::config::ConfigSource;
use crate::error::WaypointError;
use crate::filter::FilterChain;
use crate::logging;
use crate::resolve::StaticResolver;
use crate::routing::RouteTable;
use crate::server::{self, AppState, Stats};

pub async fn execute(args: RunArgs) -> Result<(), WaypointError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let source = resolve_file_source(args.config.as_deref()).await?;
    let (mut config, version) = source.load().await?;

    // Apply CLI timeout override if it differs from the config default
    if args.timeout != config.defaults.timeout {
        config.defaults.timeout = args.timeout;
    }

    let route_table = RouteTable::from_config(&config.routes)?;
    let resolver = StaticResolver::from_backends(&config.backends)?;
    let backend_count = resolver.len();
    let route_count = route_table.len();

    let state = Arc::new(AppState {
        route_table,
        resolver: Box::new(resolver),
        filter_chain: FilterChain::standard(),
        defaults: config.defaults,
        http_client: server::build_http_client(),
        start_time: Instant::now(),
        config_source: source.name().to_string(),
        config_version: version,
        config_loaded_at: Instant::now(),
        backend_count,
        stats: Stats::new(),
    });

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        routes = route_count,
        backends = backend_count,
        "waypoint started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(server::shutdown_signal())
    .await?;

    tracing::info!("waypoint stopped");
    Ok(())
}

async fn resolve_file_source(
    explicit: Option<&std::path::Path>,
) -> Result<Box<dyn ConfigSource>, WaypointError> {
    if let Some(path) = explicit {
        return create_file_source(path);
    }

    // Auto-detect in current directory
    let candidates = [
        "waypoint.yaml",
        "waypoint.yml",
        "waypoint.json",
        "waypoint.toml",
    ];

    for name in &candidates {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return create_file_source(&path);
        }
    }

    Err(WaypointError::NoConfigSource {
        hint: "Provide --config <file> or place a waypoint.yaml in the working directory.\n  \
               Run 'waypoint init' to create a config file."
            .into(),
    })
}

fn create_file_source(path: &std::path::Path) -> Result<Box<dyn ConfigSource>, WaypointError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(WaypointError::UnsupportedFormat(other.to_string())),
    }
}
