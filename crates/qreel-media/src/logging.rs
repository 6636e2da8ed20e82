//! Structured render logging.

use tracing::{error, info, warn, Span};

use qreel_models::RenderId;

/// Logger carrying the render ID and operation on every event.
#[derive(Debug, Clone)]
pub struct RenderLogger {
    render_id: String,
    operation: String,
}

impl RenderLogger {
    pub fn new(render_id: &RenderId, operation: &str) -> Self {
        Self {
            render_id: render_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            render_id = %self.render_id,
            operation = %self.operation,
            "Render started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            render_id = %self.render_id,
            operation = %self.operation,
            "Render progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            render_id = %self.render_id,
            operation = %self.operation,
            "Render warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            render_id = %self.render_id,
            operation = %self.operation,
            "Render error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            render_id = %self.render_id,
            operation = %self.operation,
            "Render completed: {}", message
        );
    }

    pub fn render_id(&self) -> &str {
        &self.render_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span that groups every event of this render.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "render",
            render_id = %self.render_id,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_logger_creation() {
        let id = RenderId::new();
        let logger = RenderLogger::new(&id, "render");
        assert_eq!(logger.render_id(), id.as_str());
        assert_eq!(logger.operation(), "render");
    }
}
