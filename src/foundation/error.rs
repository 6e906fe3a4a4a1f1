/// Convenience result type used across strata.
pub type StrataResult<T> = Result<T, StrataError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum StrataError {
    /// Pixel access outside the raster dimensions.
    #[error("out of bounds: ({x}, {y}) outside {width}x{height}")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Raster width.
        width: u32,
        /// Raster height.
        height: u32,
    },

    /// `pop_active_layer` without a matching push.
    #[error("active layer stack is empty")]
    EmptyStack,

    /// A layer (or other named entity) is not owned by the stack.
    #[error("not found: {0}")]
    NotFound(String),

    /// Kernel coefficients do not match the kernel dimensions.
    #[error("invalid kernel data: expected {expected} coefficients, got {actual}")]
    InvalidKernelData {
        /// `width * height` of the kernel.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// All-zero kernel cannot be normalized.
    #[error("degenerate kernel: {0}")]
    DegenerateKernel(String),

    /// Invalid user-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing recipes.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Build a [`StrataError::OutOfBounds`] value.
    pub fn out_of_bounds(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a [`StrataError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`StrataError::InvalidKernelData`] value.
    pub fn invalid_kernel_data(expected: usize, actual: usize) -> Self {
        Self::InvalidKernelData { expected, actual }
    }

    /// Build a [`StrataError::DegenerateKernel`] value.
    pub fn degenerate_kernel(msg: impl Into<String>) -> Self {
        Self::DegenerateKernel(msg.into())
    }

    /// Build a [`StrataError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StrataError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
