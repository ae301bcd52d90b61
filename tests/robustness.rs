//! Robustness tests for edge cases and error conditions.
//!
//! HTTP tests run against a throwaway server on 127.0.0.1 so the real
//! transport is exercised without leaving the machine.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use netrules::config::Config;
use netrules::fetcher::{Fetcher, HttpTransport};
use netrules::merger::Merger;
use netrules::params::ConversionParams;
use netrules::resource::convert_resource;
use netrules::source::RuleSource;
use netrules::transcoder::{MalformedLinePolicy, Transcoder};
use netrules::RulesError;

/// path -> (status, body, delay)
type Routes = HashMap<&'static str, (u16, String, u64)>;

/// Serve `routes` over plain HTTP/1.1 and return the base URL.
async fn serve(routes: Routes) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body, delay) = routes
                    .get(path.as_str())
                    .cloned()
                    .unwrap_or((404, String::new(), 0));

                tokio::time::sleep(Duration::from_millis(delay)).await;
                let response = format!(
                    "HTTP/1.1 {} Status\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

fn fetcher(config: &Config) -> Fetcher<HttpTransport> {
    Fetcher::new(HttpTransport::new(config).unwrap(), config.concurrency)
}

#[tokio::test]
async fn test_http_fetch_success_and_rejection() {
    let mut routes = Routes::new();
    routes.insert("/ok.yaml", (200, "payload:\n  - \"a.com\"\n".to_string(), 0));
    routes.insert("/gone.yaml", (410, "gone".to_string(), 0));
    let base = serve(routes).await;

    let fetcher = fetcher(&Config::default());

    let ok = fetcher.fetch(&RuleSource::new(format!("{}/ok.yaml", base))).await;
    assert!(ok.succeeded);
    assert_eq!(ok.status, "HTTP 200");
    assert_eq!(ok.body, "payload:\n  - \"a.com\"\n");

    let gone = fetcher.fetch(&RuleSource::new(format!("{}/gone.yaml", base))).await;
    assert!(!gone.succeeded);
    assert_eq!(gone.status, "HTTP 410");
    assert!(gone.body.is_empty());
}

#[tokio::test]
async fn test_http_body_size_cap() {
    let mut routes = Routes::new();
    routes.insert("/big.yaml", (200, "x".repeat(4096), 0));
    let base = serve(routes).await;

    let config = Config {
        max_body_bytes: 1024,
        ..Config::default()
    };
    let outcome = fetcher(&config)
        .fetch(&RuleSource::new(format!("{}/big.yaml", base)))
        .await;

    assert!(!outcome.succeeded);
    assert!(outcome.status.contains("too large"));
}

#[tokio::test]
async fn test_http_timeout_is_a_failed_outcome() {
    let mut routes = Routes::new();
    routes.insert("/slow.yaml", (200, "payload:".to_string(), 3000));
    let base = serve(routes).await;

    let config = Config {
        timeout_secs: 1,
        ..Config::default()
    };
    let outcome = fetcher(&config)
        .fetch(&RuleSource::new(format!("{}/slow.yaml", base)))
        .await;

    assert!(!outcome.succeeded);
    assert!(matches!(
        outcome.into_body(),
        Err(RulesError::Transport(_))
    ));
}

#[tokio::test]
async fn test_connection_refused_is_a_failed_outcome() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = fetcher(&Config::default())
        .fetch(&RuleSource::new(format!("http://{}/rules.yaml", addr)))
        .await;
    assert!(!outcome.succeeded);
}

#[tokio::test]
async fn test_merge_over_http_keeps_input_order() {
    let mut routes = Routes::new();
    routes.insert(
        "/telegram.yaml",
        (200, "payload:\n  - \"91.108.56.0/22\"\n".to_string(), 300),
    );
    routes.insert("/broken.yaml", (500, "oops".to_string(), 0));
    routes.insert(
        "/apple.yaml",
        (200, "# NAME: apple\npayload:\n  - \"+.apple.com\"\n".to_string(), 0),
    );
    let base = serve(routes).await;

    let sources: Vec<RuleSource> = ["telegram", "broken", "apple"]
        .iter()
        .map(|name| RuleSource::new(format!("{}/{}.yaml", base, name)))
        .collect();

    let config = Config {
        concurrency: 2,
        ..Config::default()
    };
    let document = Merger::new(fetcher(&config)).merge(&sources).await;

    let expected = format!(
        "# Merged rules for the following 3 subscription URLs:\n\
         # {b}/telegram.yaml\n# {b}/broken.yaml\n# {b}/apple.yaml\n\
         payload:\n\
         # {b}/telegram.yaml\n- \"91.108.56.0/22\"\n\
         # {b}/broken.yaml\n\
         # {b}/apple.yaml\n- \"+.apple.com\"\n",
        b = base
    );
    assert_eq!(document.to_string(), expected);
}

#[test]
fn test_malformed_line_policy_from_config() {
    let config: Config = serde_yaml::from_str("on_malformed_line: skip\n").unwrap();
    let params = ConversionParams::parse(
        "https://example.com/a.yaml?src=clash&dst=quan&type=rule&subtype=domain&policy=REJECT",
    )
    .unwrap();
    let content = "payload:\n  - \"ads.com\"\n  - ads.net\n  - \"+.track.io\"\n";

    let err = convert_resource(&Transcoder::default(), &params, content).unwrap_err();
    assert_eq!(err, RulesError::MalformedLine("- ads.net".to_string()));

    let output =
        convert_resource(&Transcoder::new(config.on_malformed_line), &params, content).unwrap();
    assert_eq!(output, "HOST,ads.com,REJECT\nHOST-SUFFIX,track.io,REJECT");
    assert_eq!(config.on_malformed_line, MalformedLinePolicy::Skip);
}

#[test]
fn test_asn_and_empty_results_are_distinct() {
    let params = ConversionParams::parse(
        "https://example.com/asn.list?src=any&dst=quan&type=rule&subtype=ipasn&policy=PROXY",
    )
    .unwrap();

    let output = convert_resource(
        &Transcoder::default(),
        &params,
        "# Telegram\nIP-ASN,62041\nIP-ASN , 59930 // secondary\n",
    )
    .unwrap();
    assert_eq!(output, "IP-ASN,62041,PROXY\nIP-ASN,59930,PROXY");

    let err = convert_resource(&Transcoder::default(), &params, "# nothing\n").unwrap_err();
    assert_eq!(err, RulesError::NoMatches);
}

#[test]
fn test_identifier_edge_cases() {
    for identifier in [
        "",
        "https://example.com/a.yaml",
        "https://example.com/a.yaml?src=clash?dst=quan",
        "https://example.com/a.yaml?src",
        "https://example.com/a.yaml?src=clash&&dst=quan",
    ] {
        assert!(
            matches!(
                ConversionParams::parse(identifier),
                Err(RulesError::InvalidParams(_))
            ),
            "identifier {:?} should be rejected",
            identifier
        );
    }
}

#[test]
fn test_unicode_rule_values_pass_through() {
    let params = ConversionParams::parse(
        "https://example.com/a.yaml?src=clash&dst=quan&type=rule&subtype=domain&policy=🚀 Proxy",
    )
    .unwrap();
    let output = convert_resource(
        &Transcoder::default(),
        &params,
        "payload:\n  - \"例子.测试\"\n",
    )
    .unwrap();
    assert_eq!(output, "HOST,例子.测试,🚀 Proxy");
}

#[test]
fn test_yaml_malformed_config() {
    let result: Result<Config, _> = serde_yaml::from_str("concurrency: [unclosed");
    assert!(result.is_err());

    let result: Result<Config, _> = serde_yaml::from_str("on_malformed_line: ignore\n");
    assert!(result.is_err());
}
