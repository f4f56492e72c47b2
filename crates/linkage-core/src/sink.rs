//! Operator-facing message output.
//!
//! The kinematics core never prints directly. Lines meant for the operator
//! (rejected moves, soft-limit hits, start-up geometry) go through a
//! [`MessageSink`] so the host decides where they end up.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MsgLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl fmt::Display for MsgLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        })
    }
}

pub trait MessageSink {
    fn message(&mut self, level: MsgLevel, text: &str);
}

/// Discards every message.
impl MessageSink for () {
    fn message(&mut self, _level: MsgLevel, _text: &str) {}
}

impl<S: MessageSink + ?Sized> MessageSink for &mut S {
    fn message(&mut self, level: MsgLevel, text: &str) {
        (**self).message(level, text);
    }
}

/// Forwards messages to `tracing` under the `linkage` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn message(&mut self, level: MsgLevel, text: &str) {
        match level {
            MsgLevel::Error => tracing::error!(target: "linkage", "{text}"),
            MsgLevel::Warning => tracing::warn!(target: "linkage", "{text}"),
            MsgLevel::Info => tracing::info!(target: "linkage", "{text}"),
            MsgLevel::Debug => tracing::debug!(target: "linkage", "{text}"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<(MsgLevel, String)>,
}

impl RecordingSink {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|(_, text)| text.as_str())
    }

    pub fn count(&self, level: MsgLevel) -> usize {
        self.messages.iter().filter(|(l, _)| *l == level).count()
    }
}

impl MessageSink for RecordingSink {
    fn message(&mut self, level: MsgLevel, text: &str) {
        self.messages.push((level, text.to_owned()));
    }
}
