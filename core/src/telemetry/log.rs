use log::{debug, warn};

/// Routes kernel diagnostics to a fixed `log` target.
#[derive(Debug, Clone, Copy)]
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn record(&self, message: &str) {
        debug!(target: self.target, "{}", message);
    }

    pub fn degenerate(&self, message: &str) {
        warn!(target: self.target, "{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("fkcore")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_is_crate_name() {
        assert_eq!(LogManager::default().target(), "fkcore");
        let logger = LogManager::new("fkcore::bbfk");
        logger.record("no logger installed");
        assert_eq!(logger.target(), "fkcore::bbfk");
    }
}
