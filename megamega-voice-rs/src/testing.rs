//! Recording sinks for unit tests.

use crate::panel::DisplaySink;
use crate::registers::{ChannelGroup, RegisterSink, RegisterWrite};

/// Records every register write in order.
#[derive(Debug, Default)]
pub(crate) struct RegisterLog {
    writes: Vec<RegisterWrite>,
}

impl RegisterLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Data bytes only.
    pub(crate) fn values(&self) -> Vec<u8> {
        self.writes.iter().map(|w| w.value).collect()
    }

    pub(crate) fn clear(&mut self) {
        self.writes.clear();
    }
}

impl RegisterSink for RegisterLog {
    fn write(&mut self, group: ChannelGroup, register: u8, value: u8) {
        self.writes.push(RegisterWrite::new(group, register, value));
    }
}

/// Records every display update; keeps the latest pair of lines.
#[derive(Debug, Default)]
pub(crate) struct DisplayLog {
    shown: Vec<(String, String)>,
}

impl DisplayLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The most recent pair of lines, if anything was shown.
    pub(crate) fn lines(&self) -> Option<(&str, &str)> {
        self.shown.last().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub(crate) fn count(&self) -> usize {
        self.shown.len()
    }
}

impl DisplaySink for DisplayLog {
    fn show(&mut self, line1: &str, line2: &str) {
        self.shown.push((line1.into(), line2.into()));
    }
}
