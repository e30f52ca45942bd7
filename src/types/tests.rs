use super::*;

fn sample_chunk() -> Chunk {
    Chunk {
        id: "chunk_2".to_string(),
        file: "src/server.go".to_string(),
        code: "func Serve() {}".to_string(),
        start_line: 10,
        end_line: 10,
        symbol: "Serve".to_string(),
        kind: "function_declaration".to_string(),
        language: Some("go".to_string()),
        source_type: Some(SourceType::Ast),
    }
}

#[test]
fn test_chunk_serializes_with_camel_case_keys() {
    let json = serde_json::to_value(sample_chunk()).unwrap();

    assert_eq!(json["id"], "chunk_2");
    assert_eq!(json["startLine"], 10);
    assert_eq!(json["endLine"], 10);
    assert_eq!(json["type"], "function_declaration");
    assert_eq!(json["sourceType"], "ast");
    assert_eq!(json["language"], "go");
}

#[test]
fn test_chunk_omits_absent_metadata() {
    let mut chunk = sample_chunk();
    chunk.language = None;
    chunk.source_type = None;

    let json = serde_json::to_string(&chunk).unwrap();
    assert!(!json.contains("language"));
    assert!(!json.contains("sourceType"));
}

#[test]
fn test_chunk_line_is_single_line_json() {
    let mut chunk = sample_chunk();
    chunk.code = "func Serve() {\n\treturn\n}".to_string();

    let json = serde_json::to_string(&chunk).unwrap();
    assert!(!json.contains('\n'));
    let back: Chunk = serde_json::from_str(&json).unwrap();
    assert_eq!(back.code, chunk.code);
}

#[test]
fn test_chunk_index() {
    assert_eq!(sample_chunk().index(), Some(2));

    let mut odd = sample_chunk();
    odd.id = "other".to_string();
    assert_eq!(odd.index(), None);
}

#[test]
fn test_scored_chunk_accepts_capitalized_keys() {
    let json = r#"{"ID":"chunk_0","File":"main.go","Code":"func main() {}","Score":0.82}"#;
    let chunk: ScoredChunk = serde_json::from_str(json).unwrap();

    assert_eq!(chunk.id, "chunk_0");
    assert_eq!(chunk.file, "main.go");
    assert!((chunk.score - 0.82).abs() < 1e-6);
}

#[test]
fn test_scored_chunk_accepts_lowercase_keys() {
    let json = r#"{"id":"chunk_1","file":"a.ts","code":"class A {}","score":0.5}"#;
    let chunk: ScoredChunk = serde_json::from_str(json).unwrap();
    assert_eq!(chunk.file, "a.ts");
}

#[test]
fn test_chat_message_roles() {
    let json = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
    assert_eq!(json["role"], "system");

    let json = serde_json::to_value(ChatMessage::user("why?")).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["content"], "why?");
}

#[test]
fn test_index_response_default() {
    let response = IndexResponse::default();
    assert_eq!(response.chunks_written, 0);
    assert!(response.errors.is_empty());
}
