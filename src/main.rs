use lexsum::{api, config, logging, processing, ratelimit, summarization};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    config::init_config();
    logging::init_tracing();

    let config = config::get_config();
    let client = summarization::OpenAiCompletionClient::from_config();
    let summarizer = summarization::Summarizer::new(Box::new(client));
    let service = Arc::new(processing::SummarizeService::new(
        summarizer,
        config.chunk_max_tokens,
    ));
    let limiter = Arc::new(ratelimit::SlidingWindowLimiter::new(
        config.rate_limit_max_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    ));
    let app = api::create_router(service, limiter);

    let (listener, port) = bind_listener().await.expect("Failed to bind listener");
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

async fn bind_listener() -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    let config = config::get_config();
    let port = config
        .server_port
        .unwrap_or(config::DEFAULT_SERVER_PORT);
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .map(|listener| (listener, port))
}
