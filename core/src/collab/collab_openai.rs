use crate::collab::Collaborator;
use crate::config::Config;
use crate::error::{EditError, ErrorCode, Result};
use crate::prompts::EditRequest;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader};
use std::time::Duration;

const CONTEXT: &str = "chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

/// One line of a server-sent-event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Fragment(String),
    Done,
    Skip,
}

pub fn parse_event_line(line: &str) -> Result<StreamEvent> {
    let Some(payload) = line.trim_end().strip_prefix("data:") else {
        // blank separators, comments, `event:` and `id:` fields
        return Ok(StreamEvent::Skip);
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return Ok(StreamEvent::Done);
    }
    if payload.is_empty() {
        return Ok(StreamEvent::Skip);
    }

    let chunk: ChatChunk = serde_json::from_str(payload).map_err(|e| EditError::Collaborator {
        code: ErrorCode::ReplyStreamCorrupt,
        message: format!("Could not decode stream event: {}", e),
        context: payload.chars().take(120).collect(),
    })?;
    let text: String = chunk
        .choices
        .into_iter()
        .filter_map(|choice| choice.delta.content)
        .collect();

    Ok(if text.is_empty() { StreamEvent::Skip } else { StreamEvent::Fragment(text) })
}

/// Streaming client for an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiCollaborator {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCollaborator {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EditError::Collaborator {
                code: ErrorCode::CollaboratorUnreachable,
                message: format!("Failed to create HTTP client: {}", e),
                context: CONTEXT.to_string(),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

impl Collaborator for OpenAiCollaborator {
    fn send(&self, request: &EditRequest, on_fragment: &mut dyn FnMut(&str)) -> Result<()> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system },
                ChatMessage { role: "user", content: &request.user },
            ],
            temperature: self.temperature,
            stream: true,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| EditError::Collaborator {
                code: ErrorCode::CollaboratorUnreachable,
                message: format!("Failed to send request: {}", e),
                context: self.endpoint.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(EditError::Collaborator {
                code: ErrorCode::CollaboratorRejected,
                message: format!("API error {}: {}", status, detail.trim()),
                context: self.endpoint.clone(),
            });
        }

        for line in BufReader::new(response).lines() {
            let line = line.map_err(|e| EditError::Collaborator {
                code: ErrorCode::ReplyStreamCorrupt,
                message: format!("Reply stream interrupted: {}", e),
                context: self.endpoint.clone(),
            })?;
            match parse_event_line(&line)? {
                StreamEvent::Fragment(text) => on_fragment(&text),
                StreamEvent::Done => break,
                StreamEvent::Skip => {}
            }
        }
        Ok(())
    }
}
