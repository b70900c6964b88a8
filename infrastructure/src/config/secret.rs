//! Secret resolution: a direct config value wins, otherwise the named
//! environment variable is read. Blank values count as unset.

/// Reads a variable from the process environment.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

pub fn resolve_secret<F>(direct: Option<&str>, env_name: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    direct
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| {
            if env_name.is_empty() {
                return None;
            }
            lookup(env_name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}
