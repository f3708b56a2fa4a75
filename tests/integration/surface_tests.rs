//! Tests for the console and HTTP surfaces over real sockets

use crate::common::{create_test_config, mount_farm, mount_listing, wait_for_farms};
use farmstats::Pipeline;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use wiremock::MockServer;

struct ConsoleClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl ConsoleClient {
    async fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("Failed to connect");
        let (reader, writer) = stream.into_split();
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }

    async fn read_line(&mut self) -> String {
        self.lines
            .next_line()
            .await
            .expect("Failed to read")
            .expect("Console closed the connection")
    }

    async fn send(&mut self, line: &str) -> String {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("Failed to write");
        self.read_line().await
    }
}

#[tokio::test]
async fn test_console_session() {
    let mock_server = MockServer::start().await;
    mount_farm(&mock_server, "1AAAAA", &[("Abigail", "9")]).await;

    let mut config = create_test_config(&mock_server.uri());
    config.console.listen = Some("127.0.0.1:0".to_string());

    let pipeline = Pipeline::from_config(config).unwrap();
    let handle = pipeline.handle();
    let bound = pipeline.serve().await.unwrap();

    let mut client = ConsoleClient::connect(bound.console.unwrap()).await;
    assert_eq!(client.read_line().await, "welcome");
    assert_eq!(client.send("/ping").await, "pong");
    assert_eq!(client.send("").await, "/help for help");
    assert_eq!(client.send("/bogus").await, "unknown command [/bogus]");
    assert_eq!(client.send("nope").await, "invalid farm id");
    assert_eq!(client.send("1AAAAA.extra").await, "queued farm id 1AAAAA");

    wait_for_farms(&handle, 1).await;

    assert_eq!(client.send("/show").await, "stats:");
    assert_eq!(client.read_line().await, "1AAAAA likes Abigail 9/10");

    assert_eq!(
        client.send("/status").await,
        "spiders running [0], stop requested [false], queue [0/20], farms [1]"
    );

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_console_spider_commands() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, 0, &["1AAAAA"]).await;
    mount_farm(&mock_server, "1AAAAA", &[("Abigail", "4")]).await;

    let mut config = create_test_config(&mock_server.uri());
    config.console.listen = Some("127.0.0.1:0".to_string());

    let pipeline = Pipeline::from_config(config).unwrap();
    let handle = pipeline.handle();
    let bound = pipeline.serve().await.unwrap();

    let mut client = ConsoleClient::connect(bound.console.unwrap()).await;
    client.read_line().await;

    assert_eq!(client.send("/spider x").await, "invalid page number [x]");
    assert_eq!(client.send("/spider").await, "spidering latest page");

    wait_for_farms(&handle, 1).await;
    assert_eq!(client.send("/stop").await, "stop requested");

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_http_api() {
    let mock_server = MockServer::start().await;
    mount_farm(&mock_server, "1AAAAA", &[("Abigail", "6"), ("Maru", "2")]).await;

    let mut config = create_test_config(&mock_server.uri());
    config.http.listen = Some("127.0.0.1:0".to_string());

    let pipeline = Pipeline::from_config(config).unwrap();
    let handle = pipeline.handle();
    let bound = pipeline.serve().await.unwrap();
    let base = format!("http://{}", bound.http.unwrap());
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/farms/1AAAAA", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 202);

    let response = client
        .post(format!("{}/farms/bad", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    wait_for_farms(&handle, 1).await;

    let farms: Value = client
        .get(format!("{}/farms", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .map(|body| serde_json::from_str(&body).unwrap())
        .unwrap();
    assert_eq!(farms[0]["farm_id"], "1AAAAA");
    assert_eq!(farms[0]["scores"]["Maru"], 2);

    let response = client
        .get(format!("{}/farms/1ZZZZZ", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let status: Value = client
        .get(format!("{}/status", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .map(|body| serde_json::from_str(&body).unwrap())
        .unwrap();
    assert_eq!(status["farms"], 1);
    assert_eq!(status["queue_capacity"], 20);

    pipeline.shutdown().await;
}

#[tokio::test]
async fn test_bind_failure_is_fatal() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap();

    let mut config = create_test_config("http://127.0.0.1:9");
    config.console.listen = Some(addr.to_string());

    let pipeline = Pipeline::from_config(config).unwrap();
    assert!(pipeline.serve().await.is_err());
    pipeline.shutdown().await;
}
