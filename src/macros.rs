//! Internal logging macros.
//!
//! Debug lines go to the transport's diagnostic sink prefixed with
//! `servo[<id>].`, and to `defmt` when that feature is enabled.

macro_rules! servo_debug {
    ($transport:expr, $id:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($fmt $(, $arg)*);
        $crate::transport::Transport::log(
            &mut *$transport,
            format_args!(concat!("servo[{}].", $fmt), $id $(, $arg)*),
        );
    }};
}

// Local rejections must not touch the transport, so warnings only reach defmt.
macro_rules! servo_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($fmt $(, $arg)*);
    }};
}
