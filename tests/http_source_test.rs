use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread;

use book_aggregator::error::LoadError;
use book_aggregator::model::Dataset;
use book_aggregator::pipeline::load_records;
use book_aggregator::source::Source;

fn init() {
    let _ = pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

const CATALOG: &str = "{\"language_code\": \"eng\"}\n\n{\"language_code\": \"ger\"}\n";

/// Minimal HTTP/1.1 server: one response per connection, then close.
fn serve() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            // drain headers
            let mut header = String::new();
            while reader.read_line(&mut header).map(|n| n > 2).unwrap_or(false) {
                header.clear();
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, body): (&str, Vec<u8>) = match path {
                "/catalog.json" => ("200 OK", CATALOG.as_bytes().to_vec()),
                "/catalog.json.zst" => (
                    "200 OK",
                    zstd::encode_all(CATALOG.as_bytes(), 3).unwrap(),
                ),
                "/broken.json" => ("200 OK", b"{\"language_code\": \"eng\"}\nnope\n".to_vec()),
                _ => ("404 Not Found", b"not found".to_vec()),
            };
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&body);
            let _ = stream.flush();
        }
    });
    addr
}

fn url(addr: SocketAddr, path: &str) -> Source {
    Source::from(format!("http://{addr}{path}").as_str())
}

#[tokio::test]
async fn test_url_source() {
    init();
    let addr = serve();
    let records = load_records(Dataset::Catalog, &url(addr, "/catalog.json"))
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["language_code"], "ger");
}

#[tokio::test]
async fn test_compressed_url_source() {
    init();
    let addr = serve();
    let source = url(addr, "/catalog.json.zst");
    assert!(source.is_compressed());
    let records = load_records(Dataset::Catalog, &source).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["language_code"], "eng");
}

#[tokio::test]
async fn test_http_error_status() {
    init();
    let addr = serve();
    let err = load_records(Dataset::Works, &url(addr, "/missing.json"))
        .await
        .unwrap_err();
    match err {
        LoadError::SourceUnavailable {
            dataset,
            source_name,
            ..
        } => {
            assert_eq!(dataset, Dataset::Works);
            assert!(source_name.ends_with("/missing.json"));
        }
        other => panic!("expected unavailable source, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_remote_body() {
    init();
    let addr = serve();
    let err = load_records(Dataset::Genres, &url(addr, "/broken.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse { dataset: Dataset::Genres, line: 1, .. }));
}
