use super::{MessageFields, MessageType, ReplyMessage, Sender};
use crate::config::MessageConfig;
use crate::jid::{DEFAULT_USER_SERVER, decode_jid, parsed_jid, sender_local_part};
use crate::types::{MessageContent, QuotedPayload, RawMessage};

/// Resolves the content sub-type in fixed priority order and extracts the
/// plain text, if any.
pub fn classify_content(content: &MessageContent) -> (MessageType, String) {
    let media = [
        (content.image_message.is_some(), MessageType::Image),
        (content.video_message.is_some(), MessageType::Video),
        (content.audio_message.is_some(), MessageType::Audio),
        (content.document_message.is_some(), MessageType::Document),
        (content.sticker_message.is_some(), MessageType::Sticker),
    ];
    let text = content.conversation.clone().unwrap_or_default();

    let kind = media
        .iter()
        .find(|(present, _)| *present)
        .map(|(_, kind)| *kind)
        .unwrap_or(if text.is_empty() {
            MessageType::Unknown
        } else {
            MessageType::Text
        });
    (kind, text)
}

pub fn reply_descriptor(quoted: Option<&QuotedPayload>) -> Option<ReplyMessage> {
    quoted.map(|q| ReplyMessage {
        kind: "extendedTextMessage",
        key: q.key.clone(),
    })
}

/// `123:4@s.whatsapp.net` and `123@lid` both become `123@s.whatsapp.net`.
fn sender_jid(sender: &str) -> String {
    let user = sender_local_part(sender);
    let user = user.split(':').next().unwrap_or_default();
    format!("{user}@{DEFAULT_USER_SERVER}")
}

pub(super) fn normalize(user_id: &str, config: &MessageConfig, raw: &RawMessage) -> MessageFields {
    let key = raw.key.clone();
    let sender = raw.sender.as_deref();
    let local = sender.map(sender_local_part).unwrap_or_default();

    let (message_type, text_data) = raw
        .message
        .as_ref()
        .map(classify_content)
        .unwrap_or_default();

    MessageFields {
        user: decode_jid(user_id),
        id: key.as_ref().and_then(|k| k.id.clone()),
        jid: key.as_ref().and_then(|k| k.remote_jid.clone()),
        from_me: key.as_ref().and_then(|k| k.from_me).unwrap_or(false),
        key,
        is_group: raw.is_group.unwrap_or(false),
        push_name: raw.push_name.clone(),
        text: raw.body.clone(),
        timestamp: raw.message_timestamp.map(|t| t.seconds()),
        sender: Sender {
            jid: sender.map(sender_jid),
            name: raw.push_name.clone().unwrap_or_default(),
        },
        participant: sender.and_then(|s| parsed_jid(&decode_jid(s)).into_iter().next()),
        sudo: config.sudo.contains(local),
        devs: config.devs.contains(local),
        prefix: config.prefix.clone(),
        message_type,
        text_data,
        reply_message: reply_descriptor(raw.quoted.as_ref()),
    }
}
