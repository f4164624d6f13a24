use cf_whitelist::{Config, Credentials, Processor, WhitelistError};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RULES_PATH: &str = "/zones/z1/firewall/access_rules/rules";

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn processor(server: &MockServer, input: &NamedTempFile) -> (Processor, Config) {
    let config = Config::new(Credentials::new("ops@example.com", "k3y"), input.path())
        .with_base_url(server.uri());
    (Processor::new(&config).unwrap(), config)
}

fn created(ip: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": {
            "id": format!("rule-{ip}"),
            "mode": "whitelist",
            "configuration": {"target": "ip", "value": ip}
        }
    }))
}

#[tokio::test]
async fn whitelists_single_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .and(header("x-auth-email", "ops@example.com"))
        .and(header("x-auth-key", "k3y"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "mode": "whitelist",
            "configuration": {"target": "ip", "value": "8.8.8.8"},
            "notes": "test"
        })))
        .respond_with(created("8.8.8.8"))
        .expect(1)
        .mount(&server)
        .await;

    let input = input_file("8.8.8.8\n");
    let (processor, config) = processor(&server, &input);

    let result = processor
        .process_file("z1", Some("test"), &config.input)
        .await
        .unwrap();

    assert_eq!(result.total(), 1);
    assert_eq!(result.added[0].to_string(), "Added 8.8.8.8 to zone z1.");
    assert_eq!(result.added[0].rule.as_ref().unwrap().id, "rule-8.8.8.8");
}

#[tokio::test]
async fn one_request_per_non_blank_line_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .respond_with(created("any"))
        .expect(3)
        .mount(&server)
        .await;

    let input = input_file("1.1.1.1\n\n2.2.2.2\r\n\n3.3.3.3");
    let (processor, config) = processor(&server, &input);

    let result = processor.process_file("z1", None, &config.input).await.unwrap();
    let ips: Vec<_> = result.added.iter().map(|a| a.ip.as_str()).collect();
    assert_eq!(ips, ["1.1.1.1", "2.2.2.2", "3.3.3.3"]);

    let requests = server.received_requests().await.unwrap();
    let sent: Vec<String> = requests
        .iter()
        .map(|r| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["configuration"]["value"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(sent, ["1.1.1.1", "2.2.2.2", "3.3.3.3"]);
}

#[tokio::test]
async fn whitespace_only_line_still_sends_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .and(body_json(json!({
            "mode": "whitelist",
            "configuration": {"target": "ip", "value": "   "},
            "notes": "raw"
        })))
        .respond_with(created("   "))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .and(body_json(json!({
            "mode": "whitelist",
            "configuration": {"target": "ip", "value": " 2.2.2.2 "},
            "notes": "raw"
        })))
        .respond_with(created(" 2.2.2.2 "))
        .expect(1)
        .mount(&server)
        .await;

    let input = input_file("   \n\n 2.2.2.2 \n");
    let (processor, config) = processor(&server, &input);

    let result = processor
        .process_file("z1", Some("raw"), &config.input)
        .await
        .unwrap();

    assert_eq!(result.total(), 2);
    assert_eq!(result.added[1].to_string(), "Added  2.2.2.2  to zone z1.");
}

#[tokio::test]
async fn api_rejection_is_reported_not_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{"code": 10009, "message": "firewallaccessrules.api.duplicate_of_existing"}],
            "messages": [],
            "result": null
        })))
        .expect(2)
        .mount(&server)
        .await;

    let input = input_file("1.1.1.1\n2.2.2.2\n");
    let (processor, config) = processor(&server, &input);

    let result = processor.process_file("z1", Some(""), &config.input).await.unwrap();
    assert_eq!(result.total(), 2);
    assert_eq!(result.rejected(), 2);
}

#[tokio::test]
async fn transport_failure_aborts_remaining_lines() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .and(body_json(json!({
            "mode": "whitelist",
            "configuration": {"target": "ip", "value": "1.1.1.1"}
        })))
        .respond_with(created("1.1.1.1"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RULES_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let input = input_file("1.1.1.1\n2.2.2.2\n3.3.3.3\n");
    let (processor, config) = processor(&server, &input);

    let err = processor
        .process_file("z1", None, &config.input)
        .await
        .unwrap_err();

    assert!(matches!(err, WhitelistError::ResponseParse { status: 502, .. }));
    assert_eq!(err.exit_code(), 69);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn zone_choices_map_id_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": [{"id": "z1", "name": "alpha.example", "status": "active"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let input = input_file("");
    let (processor, _) = processor(&server, &input);

    let choices = processor.zone_choices().await.unwrap();
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].value, "z1");
    assert_eq!(choices[0].name, "alpha.example");
}

#[tokio::test]
async fn missing_input_file_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(created("never"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(
        Credentials::new("ops@example.com", "k3y"),
        dir.path().join("ip_addresses.txt"),
    )
    .with_base_url(server.uri());
    let processor = Processor::new(&config).unwrap();

    let err = processor
        .process_file("z1", None, &config.input)
        .await
        .unwrap_err();
    assert!(matches!(err, WhitelistError::InputFileRead { .. }));
}
