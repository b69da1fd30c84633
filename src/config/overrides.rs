//! Command-line overrides layered over the file configuration.

use crate::config::schema::StreamerConfig;

/// Values given on the command line; `None` keeps the file's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub frame_rate: Option<u32>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, config: &mut StreamerConfig) {
        if let Some(bind) = self.bind_address {
            config.listener.bind_address = bind;
        }
        if let Some(fps) = self.frame_rate {
            config.stream.frame_rate = fps;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}
