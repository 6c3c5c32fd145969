//! Forwards analyzer log events to the `log` facade

use spin2_analyzer::logging::{LogEvent, LogLevel, Logger};

pub struct LogBridge;

impl LogBridge {
    fn level(level: LogLevel) -> log::Level {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }

    fn render(event: &LogEvent) -> String {
        let mut line = format!("{} {}", event.code, event.message);
        if let Some(span) = &event.span {
            line.push_str(&format!(" at {}", span.start()));
        }
        if !event.context.is_empty() {
            let pairs: Vec<String> = event
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            line.push_str(&format!(" ({})", pairs.join(", ")));
        }
        line
    }
}

impl Logger for LogBridge {
    fn log(&self, event: &LogEvent) {
        log::log!(target: "spin2_analyzer", Self::level(event.level), "{}", Self::render(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spin2_analyzer::logging::codes;

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogBridge::level(LogLevel::Error), log::Level::Error);
        assert_eq!(LogBridge::level(LogLevel::Warning), log::Level::Warn);
        assert_eq!(LogBridge::level(LogLevel::Debug), log::Level::Debug);
    }

    #[test]
    fn test_render_includes_context() {
        let event = LogEvent::success(codes::success::ANALYSIS_COMPLETE, "Analysis complete")
            .with_context("tokens", "12");
        assert_eq!(LogBridge::render(&event), "I070 Analysis complete (tokens=12)");
    }
}
