use std::fmt::Display;

/// Collapses keys into a regex alternation for use inside a ban pattern.
///
/// A single key is returned bare; any other count is wrapped as `(a|b|c)`.
/// Keys appear in the iteration order of `keys`, so the output of an unordered
/// collection such as a `HashSet` is not stable between runs.
///
/// ```
/// use cachet_varnish::any_key;
///
/// assert_eq!(any_key([42]), "42");
/// assert_eq!(any_key(["a", "b"]), "(a|b)");
/// ```
pub fn any_key<I>(keys: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let keys: Vec<String> = keys.into_iter().map(|k| k.to_string()).collect();
    match keys.as_slice() {
        [single] => single.clone(),
        _ => format!("({})", keys.join("|")),
    }
}

/// Joins path segments with `/` without touching slashes already present.
pub fn path<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    parts
        .into_iter()
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
