use crate::types::{ChatMessage, ScoredChunk};

/// Instructions that keep the answer grounded in the retrieved code
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a senior engineer answering questions about a codebase. Use only the provided code snippets to answer. If code reveals config, structure, or usage patterns, summarize those clearly. Do not guess or include general explanations unless they are directly inferred from the code.";

/// Build the system and user messages for one question.
///
/// Chunks appear in the order given, each as a `File:` header followed by its code.
pub fn build_prompt(system_prompt: &str, query: &str, chunks: &[ScoredChunk]) -> Vec<ChatMessage> {
    let mut content = format!("Question: {query}\n\nRelevant Code:\n\n");
    for chunk in chunks {
        content.push_str(&format!("\n---\nFile: {}\n{}\n", chunk.file, chunk.code));
    }

    vec![ChatMessage::system(system_prompt), ChatMessage::user(content)]
}
