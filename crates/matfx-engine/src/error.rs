use thiserror::Error;

/// Failures surfaced by the engine's component boundaries.
///
/// Internal helpers use `anyhow` with context; `Window`, `Renderer` and the
/// frame loop map those causes onto one of these variants. None are retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The windowing system itself could not be initialized.
    #[error("failed to initialize the windowing system: {0:#}")]
    WindowCreation(anyhow::Error),

    /// The windowing system is up but the window or its graphics context
    /// could not be created.
    #[error("failed to create window or graphics context: {0:#}")]
    ContextCreation(anyhow::Error),

    /// The GPU backend failed setup or reported an invalid state afterwards.
    #[error("failed to initialize GPU backend: {0:#}")]
    GpuInit(anyhow::Error),

    /// The GPU backend became invalid while frames were being rendered.
    #[error("GPU backend became invalid during the frame loop")]
    DeviceLost,
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cause_chain() {
        let cause = anyhow::anyhow!("no adapter").context("request_adapter failed");
        let err = EngineError::GpuInit(cause);
        let msg = err.to_string();
        assert!(msg.starts_with("failed to initialize GPU backend"));
        assert!(msg.contains("request_adapter failed"));
        assert!(msg.contains("no adapter"));
    }

    #[test]
    fn device_lost_has_fixed_message() {
        assert_eq!(
            EngineError::DeviceLost.to_string(),
            "GPU backend became invalid during the frame loop"
        );
    }
}
