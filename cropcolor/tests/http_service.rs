//! Integration tests for the HTTP service.
//!
//! Starts a real `CropColorApp` on an ephemeral port and talks plain
//! HTTP/1.1 to it. Only paths that never reach the GDAL tools are exercised.
//!
//! Run with: `cargo test --test http_service`

use std::fs;
use std::net::SocketAddr;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use cropcolor::app::{AppConfig, CropColorApp};
use cropcolor::server::{ROOT_GREETING, TEST_GREETING};

struct Running {
    _temp: TempDir,
    addr: SocketAddr,
    data_dir: std::path::PathBuf,
    stop: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
}

impl Running {
    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await.unwrap();
    }
}

async fn start() -> Running {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let config = AppConfig::new(temp.path().join("outputs"), data_dir.clone())
        .with_bind("127.0.0.1:0".parse().unwrap());

    let app = CropColorApp::start(config).await.unwrap();
    let addr = app.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        app.serve(async move {
            let _ = stopped.await;
        })
        .await
        .unwrap();
    });

    Running {
        _temp: temp,
        addr,
        data_dir,
        stop: Some(stop),
        task,
    }
}

/// Sends one request and returns (status code, raw response text).
async fn send(addr: SocketAddr, method: &str, target: &str, body: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    let status = response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap();
    (status, response)
}

#[tokio::test]
async fn test_greetings() {
    let server = start().await;

    let (status, response) = send(server.addr, "GET", "/", "").await;
    assert_eq!(status, 200);
    assert!(response.ends_with(ROOT_GREETING));

    let (status, response) = send(server.addr, "GET", "/test", "").await;
    assert_eq!(status, 200);
    assert!(response.ends_with(TEST_GREETING));

    server.stop().await;
}

#[tokio::test]
async fn test_capabilities_list_crop_color() {
    let server = start().await;

    let (status, response) = send(
        server.addr,
        "GET",
        "/wps?service=WPS&request=GetCapabilities",
        "",
    )
    .await;
    assert_eq!(status, 200);
    assert!(response.contains("\"identifier\":\"crop_color\""));

    server.stop().await;
}

#[tokio::test]
async fn test_execute_without_outputs_echoes_raster() {
    let server = start().await;

    let (status, response) = send(
        server.addr,
        "GET",
        "/wps?service=WPS&request=Execute&identifier=crop_color\
         &DataInputs=r=dem.tif;output_czml=false;output_tif=false",
        "",
    )
    .await;
    assert_eq!(status, 200);
    assert!(response.contains("\"r\":{\"data\":\"dem.tif\"}"));
    assert!(!response.contains("czml\":"));

    server.stop().await;
}

#[tokio::test]
async fn test_post_with_bad_extent_is_exception_report() {
    let server = start().await;

    let body = r#"{"identifier":"crop_color","inputs":{"r":{"href":"dem.tif"},"extent":"1,2"}}"#;
    let (status, response) = send(server.addr, "POST", "/wps", body).await;
    assert_eq!(status, 400);
    assert!(response.contains("InvalidParameterValue"));
    assert!(response.contains("\"locator\":\"extent\""));

    server.stop().await;
}

#[tokio::test]
async fn test_data_files_are_served_and_missing_ones_are_404() {
    let server = start().await;
    fs::write(server.data_dir.join("palette.txt"), "0 0 0 255\n").unwrap();

    let (status, response) = send(server.addr, "GET", "/data/palette.txt", "").await;
    assert_eq!(status, 200);
    assert!(response.ends_with("0 0 0 255\n"));

    let (status, _) = send(server.addr, "GET", "/outputs/crop_color_gone.czml", "").await;
    assert_eq!(status, 404);

    server.stop().await;
}
