use tokio::net::TcpListener;

/// Serve the echo routes on `127.0.0.1:$PORT` (default 3000) for manual
/// poking with curl or a `JsonClient`.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;
    println!("echo server listening on http://{addr}");
    println!("routes: /echo[/*], /status/{{code}}, /text, /slow");
    mock_server::run(listener).await
}
