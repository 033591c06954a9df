/// Writes a line to the notifier's diagnostic log.
///
/// See [`logger`](crate::logger) for where the line ends up.
#[macro_export]
#[doc(hidden)]
macro_rules! airbrake_debug {
    ($($arg:tt)*) => {
        $crate::logger::write_line(format_args!($($arg)*))
    };
}
