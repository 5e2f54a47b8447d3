/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Runs `f` with validation and out-of-memory errors captured on `device`.
///
/// Without the scopes such errors reach wgpu's uncaptured-error handler,
/// which panics. A captured error becomes an `Err` labelled with `what`.
pub fn capture_errors<T>(
    device: &wgpu::Device,
    what: &str,
    f: impl FnOnce() -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let out_of_memory = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);

    let value = f();

    // Scopes pop in reverse push order.
    let oom_err = pollster::block_on(out_of_memory.pop());
    let validation_err = pollster::block_on(validation.pop());

    let value = value?;
    match oom_err.or(validation_err) {
        Some(err) => Err(anyhow::anyhow!("{what} failed on the GPU: {err}")),
        None => Ok(value),
    }
}
