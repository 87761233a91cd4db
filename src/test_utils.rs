use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::MessageClient;
use crate::config::MessageConfig;
use crate::content::{
    GenerateOptions, GeneratedMessage, MediaSource, OutgoingContent, RelayOptions, SendOptions,
};
use crate::message::Message;
use crate::net::{HttpClient, HttpRequest, HttpResponse};
use crate::types::{ContextInfo, FileData, MessageContent, MessageKey, RawMessage, Timestamp};

pub const BOT_USER_ID: &str = "999:7@s.whatsapp.net";
pub const CHAT_JID: &str = "111@s.whatsapp.net";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Send {
        jid: String,
        content: OutgoingContent,
        options: SendOptions,
    },
    Relay {
        jid: String,
        message: MessageContent,
        options: RelayOptions,
    },
    GetFile(MediaSource),
    ImageAsSticker {
        jid: String,
        source: MediaSource,
    },
    GenerateFromContent {
        jid: String,
        content: MessageContent,
        options: GenerateOptions,
    },
    Generate {
        jid: String,
        content: serde_json::Value,
    },
    Interactive(serde_json::Value),
}

/// Records every call and answers with canned payloads.
#[derive(Debug, Default)]
pub struct MockMessageClient {
    calls: Mutex<Vec<Call>>,
    file: Mutex<Option<FileData>>,
    fail_sends: bool,
}

impl MockMessageClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Default::default()
        }
    }

    pub fn with_file(self, data: &[u8], mime: &str) -> Self {
        *self.file.lock().unwrap() = Some(FileData {
            data: bytes::Bytes::copy_from_slice(data),
            mime: mime.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        calls.len()
    }

    fn echo(jid: &str, n: usize, content: &OutgoingContent) -> RawMessage {
        let message = match content {
            OutgoingContent::Text { text, .. } => MessageContent::text(text.clone()),
            _ => MessageContent::default(),
        };
        RawMessage {
            key: Some(MessageKey {
                remote_jid: Some(jid.to_string()),
                from_me: Some(true),
                id: Some(format!("SENT-{n}")),
                participant: None,
            }),
            message: Some(message),
            message_timestamp: Some(Timestamp::Seconds(1_700_000_000)),
            ..Default::default()
        }
    }

    fn generated(jid: &str, message: MessageContent) -> GeneratedMessage {
        GeneratedMessage {
            key: MessageKey {
                remote_jid: Some(jid.to_string()),
                from_me: Some(true),
                id: Some("GEN-1".to_string()),
                participant: None,
            },
            message,
        }
    }
}

#[async_trait::async_trait]
impl MessageClient for MockMessageClient {
    fn user_id(&self) -> String {
        BOT_USER_ID.to_string()
    }

    async fn send_message(
        &self,
        jid: &str,
        content: OutgoingContent,
        options: SendOptions,
    ) -> anyhow::Result<RawMessage> {
        if self.fail_sends {
            return Err(anyhow::anyhow!("connection closed"));
        }
        let n = self.record(Call::Send {
            jid: jid.to_string(),
            content: content.clone(),
            options,
        });
        Ok(Self::echo(jid, n, &content))
    }

    async fn relay_message(
        &self,
        jid: &str,
        message: MessageContent,
        options: RelayOptions,
    ) -> anyhow::Result<()> {
        self.record(Call::Relay {
            jid: jid.to_string(),
            message,
            options,
        });
        Ok(())
    }

    async fn get_file(&self, source: &MediaSource) -> anyhow::Result<FileData> {
        self.record(Call::GetFile(source.clone()));
        self.file
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no file configured"))
    }

    async fn send_image_as_sticker(
        &self,
        jid: &str,
        source: &MediaSource,
        _options: SendOptions,
    ) -> anyhow::Result<RawMessage> {
        let n = self.record(Call::ImageAsSticker {
            jid: jid.to_string(),
            source: source.clone(),
        });
        Ok(Self::echo(jid, n, &OutgoingContent::Sticker {
            media: source.clone(),
        }))
    }

    async fn generate_message_from_content(
        &self,
        jid: &str,
        content: MessageContent,
        options: GenerateOptions,
    ) -> anyhow::Result<GeneratedMessage> {
        self.record(Call::GenerateFromContent {
            jid: jid.to_string(),
            content: content.clone(),
            options,
        });
        let mut message = content;
        message.context_info = Some(ContextInfo {
            is_forwarded: Some(true),
            forwarding_score: Some(1),
            ..Default::default()
        });
        Ok(Self::generated(jid, message))
    }

    async fn generate_message(
        &self,
        jid: &str,
        content: serde_json::Value,
        _options: GenerateOptions,
    ) -> anyhow::Result<GeneratedMessage> {
        self.record(Call::Generate {
            jid: jid.to_string(),
            content: content.clone(),
        });
        let mut message = MessageContent::default();
        message.extra.insert("templateMessage".to_string(), content);
        Ok(Self::generated(jid, message))
    }

    async fn create_interactive_message(
        &self,
        content: serde_json::Value,
    ) -> anyhow::Result<GeneratedMessage> {
        self.record(Call::Interactive(content.clone()));
        let mut message = MessageContent::default();
        message
            .extra
            .insert("interactiveMessage".to_string(), content);
        Ok(Self::generated(CHAT_JID, message))
    }
}

/// Replays queued responses in order; an empty queue answers with an error.
#[derive(Debug, Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> anyhow::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(anyhow::anyhow!(reason)),
            None => Err(anyhow::anyhow!("no response queued")),
        }
    }
}

pub fn incoming_text(text: &str) -> RawMessage {
    RawMessage {
        key: Some(MessageKey {
            remote_jid: Some(CHAT_JID.to_string()),
            from_me: Some(false),
            id: Some("IN-1".to_string()),
            participant: None,
        }),
        message: Some(MessageContent::text(text)),
        sender: Some("222@s.whatsapp.net".to_string()),
        is_group: Some(false),
        push_name: Some("Tester".to_string()),
        body: Some(text.to_string()),
        quoted: None,
        message_timestamp: Some(Timestamp::Seconds(1_690_000_000)),
    }
}

pub fn create_test_message(
    raw: RawMessage,
    client: Arc<MockMessageClient>,
    http: Arc<MockHttpClient>,
) -> Message {
    Message::new(
        client,
        http,
        Arc::new(MessageConfig::new("222", "333", ".")),
        raw,
    )
}
