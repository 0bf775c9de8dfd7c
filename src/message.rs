//! Rendering of records into Teams connector messages.
//!
//! A [`Message`] serializes straight into the JSON body posted to the webhook,
//! either a single line of text or a card with facts and one collapsible
//! section per error in the record's context.

use serde::Serialize;

use crate::config::{Config, Style};
use crate::record::{ContextValue, ErrorInfo, LogRecord};

/// A message ready to be posted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Message {
    Simple(SimpleMessage),
    Card(CardMessage),
}

impl Message {
    pub fn theme_color(&self) -> &str {
        match self {
            Message::Simple(simple) => &simple.theme_color,
            Message::Card(card) => &card.theme_color,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleMessage {
    pub text: String,
    pub theme_color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMessage {
    pub summary: String,
    pub theme_color: String,
    pub sections: Vec<Section>,
}

/// A block of a card. The first one describes the record itself, the rest
/// describe one error each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub activity_title: String,
    pub activity_subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_text: Option<String>,
    pub facts: Vec<Fact>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub start_group: bool,
    pub markdown: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

impl Fact {
    pub fn new<N, V>(name: N, value: V) -> Fact
    where
        N: Into<String>,
        V: Into<String>,
    {
        Fact {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Renders `record` using the current time for the `Timestamp` fact.
pub fn build(record: &LogRecord, config: &Config) -> Message {
    build_at(record, config, config.timestamp.now())
}

/// Renders `record` with an explicit value for the `Timestamp` fact.
pub fn build_at(record: &LogRecord, config: &Config, timestamp: String) -> Message {
    match config.style {
        Style::Simple => Message::Simple(simple(record, config)),
        Style::Card => Message::Card(card(record, config, timestamp)),
    }
}

fn simple(record: &LogRecord, config: &Config) -> SimpleMessage {
    let colour = record.severity.colour();
    let severity = if config.show_severity_colour {
        tint(colour, record.severity.name())
    } else {
        record.severity.name().to_string()
    };
    let prefix = if config.name.is_empty() {
        String::new()
    } else {
        format!("{} - ", config.name)
    };
    SimpleMessage {
        text: format!("{prefix}{severity}: {}", record.message),
        theme_color: colour.to_string(),
    }
}

fn card(record: &LogRecord, config: &Config, timestamp: String) -> CardMessage {
    let colour = record.severity.colour();

    let mut facts = Vec::new();
    let mut errors = Vec::new();
    for (key, value) in record.context.iter() {
        match value {
            ContextValue::Scalar(text) => facts.push(Fact::new(key, text.as_str())),
            ContextValue::Structured(json) => facts.push(Fact::new(key, format!("`{json}`"))),
            ContextValue::Error(info) => errors.push(error_section(key, info)),
        }
    }
    facts.push(Fact::new("Timestamp", timestamp));

    let activity_subtitle = if config.show_severity_colour {
        tint(colour, &record.message)
    } else {
        record.message.clone()
    };
    let activity_image = if config.show_avatars {
        record.severity.avatar().map(str::to_string)
    } else {
        None
    };
    let primary = Section {
        activity_title: config.name.clone(),
        activity_subtitle,
        activity_image,
        activity_text: None,
        facts,
        start_group: false,
        markdown: true,
    };

    let summary = if config.name.is_empty() {
        record.severity.name().to_string()
    } else {
        format!("{}: {}", record.severity, config.name)
    };
    CardMessage {
        summary,
        theme_color: colour.to_string(),
        sections: std::iter::once(primary).chain(errors).collect(),
    }
}

fn error_section(key: &str, info: &ErrorInfo) -> Section {
    // markdown only breaks lines on a blank line
    let activity_text = (!info.trace.is_empty()).then(|| info.trace.replace('\n', "\n\n"));
    Section {
        activity_title: key.to_string(),
        activity_subtitle: info.message.clone(),
        activity_image: None,
        activity_text,
        facts: vec![
            Fact::new("Code", info.code.as_str()),
            Fact::new("File", info.file.as_str()),
            Fact::new("Line", info.line.to_string()),
        ],
        start_group: true,
        markdown: true,
    }
}

fn tint(colour: &str, text: &str) -> String {
    format!("<span style=\"color:#{colour}\">{text}</span>")
}
