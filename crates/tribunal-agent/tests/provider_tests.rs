use std::{
    collections::HashMap,
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use serde_json::json;
use tracing_test::traced_test;
use tribunal_agent::{build_providers, GeminiProvider, GenerationOptions, OllamaBackend, OpenAiProvider};
use tribunal_core::{
    agent::{Adjudicator, ModelBackend, ModelRequest, TextProvider},
    config::{AiProvider, Config},
    generation::ProviderSet,
    judge::Judge,
    CaseRecord, Complexity, Role, VerdictLabel,
};

const OPTIONS: GenerationOptions = GenerationOptions {
    max_tokens: 512,
    temperature: 0.2,
    timeout_secs: 5,
};

// ── Mock server ──────────────────────────────────────────────────────────

struct MockResponse {
    status: u16,
    body: String,
}

fn ok(body: serde_json::Value) -> MockResponse {
    MockResponse {
        status: 200,
        body: body.to_string(),
    }
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 8192];
    loop {
        let n = stream.read(&mut chunk).expect("failed to read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = header_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).to_string();
            if buf.len() >= end + content_length(&head) {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serves `responses` in order, one connection each, and hands back the raw requests.
fn spawn_mock_server(responses: Vec<MockResponse>) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind test server");
    let addr = listener.local_addr().expect("failed to read local addr");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().expect("failed to accept connection");
            seen.push(read_request(&mut stream));
            let payload = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                response.status,
                response.body.len(),
                response.body
            );
            stream.write_all(payload.as_bytes()).expect("failed to write response");
        }
        seen
    });
    (format!("http://{addr}"), handle)
}

fn case() -> CaseRecord {
    CaseRecord {
        id: "c".into(),
        title: "The State vs. Julian Croft".into(),
        case_type: "Murder Case".into(),
        description: String::new(),
        summary: String::new(),
        complexity: Complexity::High,
        evidence: vec![],
        statutes: vec![],
    }
}

fn config(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_vars(&vars).unwrap()
}

// ── Gemini ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_gemini_request_and_reply() {
    let (base, handle) = spawn_mock_server(vec![ok(json!({
        "candidates": [{"content": {"parts": [{"text": "The gloves are decisive."}]}}]
    }))]);
    let provider = GeminiProvider::new("k1", "gemini-pro", OPTIONS).unwrap().with_base_url(base);

    let g = provider.generate("Argue the case").await.unwrap();
    assert_eq!(g.thought, "The gloves are decisive.");

    let requests = handle.join().unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /v1beta/models/gemini-pro:generateContent?key=k1 "));
    assert!(request.contains(r#""maxOutputTokens":512"#));
    assert!(request.contains(r#""temperature":0.2"#));
    assert!(request.contains("Argue the case"));
}

#[tokio::test]
#[traced_test]
async fn test_gemini_error_status_is_an_error() {
    let (base, handle) = spawn_mock_server(vec![MockResponse {
        status: 429,
        body: r#"{"error": "quota"}"#.into(),
    }]);
    let provider = GeminiProvider::new("k1", "gemini-pro", OPTIONS).unwrap().with_base_url(base);

    let err = provider.generate("x").await.unwrap_err();
    assert!(format!("{err:#}").contains("gemini error 429"));
    assert!(logs_contain("provider returned non-success"));
    handle.join().unwrap();
}

#[tokio::test]
async fn test_gemini_without_candidates_is_an_error() {
    let (base, handle) = spawn_mock_server(vec![ok(json!({"candidates": []}))]);
    let provider = GeminiProvider::new("k1", "gemini-pro", OPTIONS).unwrap().with_base_url(base);
    assert!(provider.generate("x").await.is_err());
    handle.join().unwrap();
}

// ── OpenAI ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openai_request_and_reply() {
    let (base, handle) = spawn_mock_server(vec![ok(json!({
        "choices": [{"message": {"role": "assistant", "content": "Reasonable doubt remains."}}]
    }))]);
    let provider = OpenAiProvider::new("sk-1", "gpt-3.5-turbo", OPTIONS).unwrap().with_base_url(base);

    let g = provider.generate("Defend the accused").await.unwrap();
    assert_eq!(g.thought, "Reasonable doubt remains.");

    let request = handle.join().unwrap().remove(0);
    assert!(request.starts_with("POST /v1/chat/completions "));
    assert!(request.to_lowercase().contains("authorization: bearer sk-1"));
    assert!(request.contains(r#""model":"gpt-3.5-turbo""#));
    assert!(request.contains(r#""max_tokens":512"#));
}

#[tokio::test]
async fn test_openai_verdict_reaches_the_judge() {
    let reply = json!({
        "verdict": "Guilty",
        "reasoning": "The chain of circumstances is complete.",
        "sentence": "Imprisonment for life",
        "sections": ["302"]
    })
    .to_string();
    let (base, handle) = spawn_mock_server(vec![ok(json!({
        "choices": [{"message": {"content": format!("```json\n{reply}\n```")}}]
    }))]);
    let provider = OpenAiProvider::new("sk-1", "gpt-4", OPTIONS).unwrap().with_base_url(base);
    let providers = ProviderSet::rule_based().with_api("openai", Arc::new(provider));

    let mut judge = Judge::new("Justice Verma", Arc::new(case()), providers).unwrap();
    let verdict = judge.render(&[]).await.unwrap();
    assert_eq!(verdict.label, VerdictLabel::Guilty);
    assert_eq!(verdict.applied_sections, vec!["302".to_string()]);
    handle.join().unwrap();
}

// ── Ollama ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ollama_sends_role_system_prompt() {
    let (base, handle) = spawn_mock_server(vec![ok(json!({
        "message": {"role": "assistant", "content": "  The motive is established.  "}
    }))]);
    let backend = OllamaBackend::new(base, "llama3", 5).unwrap();
    let case = case();
    let req = ModelRequest {
        role: Role::Prosecutor,
        agent: "Advocate Ramesh Kumar",
        case: &case,
        prompt: "Present your argument",
    };

    let g = backend.generate_argument(&req).await.unwrap().unwrap();
    assert_eq!(g.thought, "The motive is established.");

    let request = handle.join().unwrap().remove(0);
    assert!(request.starts_with("POST /api/chat "));
    assert!(request.contains(r#""stream":false"#));
    assert!(request.contains("You are Advocate Ramesh Kumar, the Public Prosecutor"));
    assert!(request.contains("The State vs. Julian Croft"));
}

#[tokio::test]
async fn test_ollama_unreachable_is_an_error() {
    let backend = OllamaBackend::new("http://127.0.0.1:9", "llama3", 2).unwrap();
    let case = case();
    let req = ModelRequest {
        role: Role::Judge,
        agent: "Justice Verma",
        case: &case,
        prompt: "Comment",
    };
    let err = backend.generate_judgment(&req).await.unwrap_err();
    assert!(format!("{err:#}").contains("ollama"));
}

// ── Provider selection ───────────────────────────────────────────────────

#[test]
fn test_rule_based_has_no_tiers() {
    let set = build_providers(&config(&[("GEMINI_API_KEY", "k")]), Some(AiProvider::RuleBased)).unwrap();
    assert!(set.is_empty());
}

#[test]
#[traced_test]
fn test_missing_key_falls_back_to_rules() {
    let set = build_providers(&config(&[]), None).unwrap();
    assert!(set.is_empty());
    assert!(logs_contain("GEMINI_API_KEY not set"));
}

#[test]
fn test_gemini_preference_adds_openai_secondary() {
    let cfg = config(&[("GEMINI_API_KEY", "k"), ("OPENAI_API_KEY", "sk")]);
    let set = build_providers(&cfg, None).unwrap();
    let mut aliases: Vec<&String> = set.apis.keys().collect();
    aliases.sort();
    assert_eq!(aliases, vec!["gemini", "openai"]);
    assert!(set.local.is_none());

    let forced = build_providers(&cfg, Some(AiProvider::OpenAi)).unwrap();
    assert_eq!(forced.apis.keys().collect::<Vec<_>>(), vec!["openai"]);
}

#[test]
fn test_local_preference_uses_ollama_tiers() {
    let cfg = config(&[
        ("AI_PROVIDER", "local"),
        ("OLLAMA_URL", "http://localhost:11434"),
        ("PRETRAINED_MODEL", "legal-bert"),
    ]);
    let set = build_providers(&cfg, None).unwrap();
    assert_eq!(set.local.as_ref().map(|b| b.name().to_string()).as_deref(), Some("llama3"));
    assert_eq!(set.pretrained.as_ref().map(|b| b.name().to_string()).as_deref(), Some("legal-bert"));
    assert!(set.apis.is_empty());
}
