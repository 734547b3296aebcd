/// Logging macros for the reader runtime
///
/// Thin wrappers over the `log` facade so dependent crates log through one
/// place without depending on `log` directly. The binary installs the
/// backend (`env_logger`).
///
/// Log debug-level message
///
/// # Example
/// ```
/// use runtime::tic_debug;
/// tic_debug!("FrameState: {:?} → {:?}", "OutsideFrame", "InsideFrame");
/// ```
#[macro_export]
macro_rules! tic_debug {
    ($($arg:tt)*) => {
        $crate::logging::__log::debug!($($arg)*)
    };
}

/// Log info-level message
///
/// Use for reader lifecycle events (start, stop, cancellation)
#[macro_export]
macro_rules! tic_info {
    ($($arg:tt)*) => {
        $crate::logging::__log::info!($($arg)*)
    };
}

/// Log warning-level message
///
/// Use for dropped frames and integrity failures
#[macro_export]
macro_rules! tic_warn {
    ($($arg:tt)*) => {
        $crate::logging::__log::warn!($($arg)*)
    };
}

/// Log error-level message
///
/// Use for transport failures that end the reader
#[macro_export]
macro_rules! tic_error {
    ($($arg:tt)*) => {
        $crate::logging::__log::error!($($arg)*)
    };
}

#[doc(hidden)]
pub use log as __log;
