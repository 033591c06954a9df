use backtrace::Backtrace;

use crate::protocol::StackFrame;
use crate::utils::function_starts_with;

/// Frames of these modules belong to capturing the backtrace itself.
const CAPTURE_FRAMES: &[&str] = &["backtrace::", "airbrake_core::"];

/// Frames of the logging pipeline that sit between the code that logged an
/// entry and the notifier.
const WELL_KNOWN_BORDER_FRAMES: &[&str] = &[
    "std::panicking::begin_panic",
    "core::panicking::panic",
    "airbrake_hook::",
    "log::",
    "tracing_core::",
    "tracing_subscriber::",
];

/// Returns the current backtrace as notice frames, innermost first.
///
/// Frames of the backtrace machinery and of this crate are removed. If the
/// notice was requested from a logging pipeline, the trace starts above its
/// outermost frame. Otherwise `skip` more frames are dropped so the trace
/// starts at the code that asked for the notice. If that would leave
/// nothing, nothing further is skipped.
pub fn current_backtrace(skip: usize) -> Vec<StackFrame> {
    backtrace_to_frames(&Backtrace::new(), skip)
}

/// Converts a `Backtrace` into notice frames.
pub fn backtrace_to_frames(bt: &Backtrace, skip: usize) -> Vec<StackFrame> {
    let frames: Vec<StackFrame> = bt
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(|symbol| {
            let function = symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_default();
            let file = symbol
                .filename()
                .map(|path| path.display().to_string())
                .unwrap_or_default();
            if function.is_empty() && file.is_empty() {
                return None;
            }
            Some(StackFrame {
                file,
                line: symbol.lineno(),
                column: symbol.colno(),
                function,
            })
        })
        .collect();

    trim_frames(frames, skip)
}

fn last_matching(frames: &[StackFrame], modules: &[&str]) -> Option<usize> {
    frames.iter().rposition(|frame| {
        modules
            .iter()
            .any(|m| function_starts_with(&frame.function, m))
    })
}

fn trim_frames(frames: Vec<StackFrame>, skip: usize) -> Vec<StackFrame> {
    let captured = last_matching(&frames, CAPTURE_FRAMES).map_or(0, |idx| idx + 1);

    let caller = match last_matching(&frames[captured..], WELL_KNOWN_BORDER_FRAMES) {
        Some(idx) => captured + idx + 1,
        None => captured + skip,
    };
    if caller < frames.len() {
        frames.into_iter().skip(caller).collect()
    } else {
        frames.into_iter().skip(captured).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(function: &str) -> StackFrame {
        StackFrame {
            function: function.into(),
            ..Default::default()
        }
    }

    fn names(frames: &[StackFrame]) -> Vec<&str> {
        frames.iter().map(|f| f.function.as_str()).collect()
    }

    #[test]
    fn test_trim_frames() {
        let frames = vec![
            frame("backtrace::backtrace::trace"),
            frame("airbrake_core::backtrace_support::current_backtrace"),
            frame("airbrake_core::notifier::Notifier::notice"),
            frame("<my_hook::Hook as logging::Hook>::fire"),
            frame("logging::dispatch"),
            frame("app::handler"),
            frame("app::main"),
        ];

        assert_eq!(
            names(&trim_frames(frames.clone(), 0)),
            [
                "<my_hook::Hook as logging::Hook>::fire",
                "logging::dispatch",
                "app::handler",
                "app::main",
            ]
        );
        assert_eq!(
            names(&trim_frames(frames.clone(), 2)),
            ["app::handler", "app::main"]
        );
        assert_eq!(names(&trim_frames(frames, 10)).len(), 4);
    }

    #[test]
    fn test_trim_at_logging_pipeline() {
        let frames = vec![
            frame("backtrace::backtrace::trace"),
            frame("airbrake_core::notifier::Notifier::notice"),
            frame("airbrake_hook::airbrake::AirbrakeHook::notice_from_entry"),
            frame("<airbrake_hook::airbrake::AirbrakeHook as airbrake_hook::hook::Hook>::fire"),
            frame("airbrake_hook::hook::Hooks::fire"),
            frame("<airbrake_hook::logger::AirbrakeLogger as log::Log>::log"),
            frame("log::__private_api::log_impl"),
            frame("app::handler"),
            frame("app::main"),
        ];

        // the pipeline frames win over a skip that is too short or too long
        assert_eq!(
            names(&trim_frames(frames.clone(), 0)),
            ["app::handler", "app::main"]
        );
        assert_eq!(
            names(&trim_frames(frames, 6)),
            ["app::handler", "app::main"]
        );

        let frames = vec![
            frame("airbrake_core::notifier::Notifier::notice"),
            frame("airbrake_hook::panic::register_panic_hook::{{closure}}"),
            frame("std::panicking::rust_panic_with_hook"),
            frame("std::panicking::begin_panic_handler"),
            frame("core::panicking::panic_fmt"),
            frame("app::parse"),
        ];
        assert_eq!(names(&trim_frames(frames, 6)), ["app::parse"]);
    }

    #[test]
    fn test_current_backtrace_skips_capture_frames() {
        let frames = current_backtrace(0);
        assert!(frames
            .iter()
            .all(|f| !f.function.starts_with("airbrake_core::backtrace_support::")));
    }
}
