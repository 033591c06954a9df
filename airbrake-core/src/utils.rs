//! Useful utilities for working with notices.

/// Parse the types name from `Debug` output.
///
/// # Examples
///
/// ```
/// use airbrake_core::utils::parse_type_from_debug;
///
/// let err = "NaN".parse::<usize>().unwrap_err();
/// assert_eq!(&parse_type_from_debug(&err), "ParseIntError");
/// ```
pub fn parse_type_from_debug<D: std::fmt::Debug + ?Sized>(d: &D) -> String {
    let dbg = format!("{:#?}", d);

    dbg.split(&[' ', '(', '{', '\r', '\n'][..])
        .next()
        .unwrap_or(&dbg)
        .trim()
        .to_owned()
}

/// Checks whether the function name starts with the given pattern.
///
/// Trait implementations (`<foo::Bar as baz::Trait>::method`) are matched on
/// the implementing type.
pub(crate) fn function_starts_with(mut func_name: &str, pattern: &str) -> bool {
    if let Some(stripped) = func_name.strip_prefix('<') {
        func_name = stripped;
    }
    func_name.starts_with(pattern)
}

/// Returns the name of the machine, if it can be determined.
pub(crate) fn hostname() -> Option<String> {
    hostname::get().ok().and_then(|name| name.into_string().ok())
}
