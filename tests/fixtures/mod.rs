//! Sample hosts shared by the integration tests.

#![allow(dead_code)]

use configurator::{ConfigSlot, Configuration, Options};

/// A host with no declarations of its own.
#[derive(Debug, Default)]
pub struct TestHost {
    slot: ConfigSlot,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&mut self) -> &mut ConfigSlot {
        &mut self.slot
    }

    /// Re-run the attachment hook, as a host does when the capability is
    /// granted again.
    pub fn reattach(&mut self) {
        self.slot.attach();
    }
}

impl Options for TestHost {
    fn config(&mut self) -> &mut Configuration {
        self.slot.config()
    }
}

/// A host that declares a nested `advanced_options` group.
#[derive(Debug, Default)]
pub struct VideoEncoder {
    slot: ConfigSlot,
}

impl VideoEncoder {
    pub fn new() -> Self {
        let mut encoder = Self::default();
        encoder
            .option("codec", "h264")
            .option_with("advanced_options", |advanced| {
                advanced.option("bitrate", 1024).option("fps", 30);
            });
        encoder
    }
}

impl Options for VideoEncoder {
    fn config(&mut self) -> &mut Configuration {
        self.slot.config()
    }
}
