use crate::slack::types::SlackMessage;
use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::{Value, json};

/// Convert a Slack timestamp ("1700000000.000100") to RFC 3339 in UTC.
/// The fractional part is read as microseconds without going through floats.
pub fn slack_ts_to_iso8601(ts: &str) -> Option<String> {
    let (seconds, fraction) = ts.trim().split_once('.').unwrap_or((ts.trim(), ""));
    let seconds: i64 = seconds.parse().ok()?;

    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let micros: u32 = if fraction.is_empty() {
        0
    } else {
        let digits = &fraction[..fraction.len().min(6)];
        format!("{:0<6}", digits).parse().ok()?
    };

    Utc.timestamp_opt(seconds, micros * 1_000)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Micros, true))
}

/// Convert whole Unix seconds to RFC 3339 in UTC
pub fn unix_to_iso8601(seconds: i64) -> Option<String> {
    Utc.timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Flatten a history or thread message. Thread replies carry no
/// `reply_count`, so it is only included for channel history.
pub fn format_message(msg: SlackMessage, include_reply_count: bool) -> Value {
    let datetime = slack_ts_to_iso8601(&msg.ts);

    let mut result = json!({
        "timestamp": msg.ts,
        "user": msg.user,
        "text": msg.text,
        "type": msg.message_type,
        "thread_ts": msg.thread_ts,
        "reactions": msg.reactions,
        "attachments": msg.attachments,
        "blocks": msg.blocks,
    });

    if let Some(datetime) = datetime {
        result["datetime"] = json!(datetime);
    }
    if include_reply_count {
        result["reply_count"] = json!(msg.reply_count);
    }

    result
}
