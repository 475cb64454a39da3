pub const CONCURRENCY_ENV: &str = "KEYINDEX_CONCURRENCY";

const MAX_REINDEX_CONCURRENCY: usize = 32;

pub(crate) fn clamp_concurrency(value: usize) -> usize {
    value.clamp(1, MAX_REINDEX_CONCURRENCY)
}

pub(crate) const DEFAULT_REINDEX_CONCURRENCY: usize = 1;

fn parse_concurrency(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .map(clamp_concurrency)
}

/// Worker count requested through `KEYINDEX_CONCURRENCY`, if set and valid.
pub fn concurrency_from_env() -> Option<usize> {
    let raw = std::env::var(CONCURRENCY_ENV).ok();
    parse_concurrency(raw.as_deref())
}
