use keyindex_protocol::ReindexReport;

pub(crate) fn render_reindex_report(report: &ReindexReport) -> String {
    let stats = &report.stats;

    let mut md = String::new();
    md.push_str("# Keyword re-index report\n\n");
    md.push_str(&format!("- Store: `{}`\n", report.store));
    md.push_str(&format!("- Scheme: `{}`\n", report.scheme));
    md.push_str(&format!(
        "- Dry run: `{}`, concurrency: `{}`\n\n",
        report.options.dry_run, report.options.concurrency
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| keys | updated | unchanged | skipped | identities | keywords | time_ms |\n");
    md.push_str("|---:|---:|---:|---:|---:|---:|---:|\n");
    md.push_str(&format!(
        "| `{}` | `{}` | `{}` | `{}` | `{}` | `{}` | `{}` |\n\n",
        stats.records,
        stats.updated,
        stats.unchanged,
        stats.skipped,
        stats.identities,
        stats.keywords,
        stats.time_ms
    ));

    if !stats.errors.is_empty() {
        md.push_str("## Skipped keys\n\n");
        md.push_str("| fingerprint | reason |\n");
        md.push_str("|---|---|\n");
        for err in &stats.errors {
            md.push_str(&format!(
                "| `{}` | {} |\n",
                err.fingerprint,
                escape_cell(&truncate_one_line(&err.reason, 160))
            ));
        }
        md.push('\n');
    }

    md
}

pub(crate) fn render_summary_line(report: &ReindexReport) -> String {
    let stats = &report.stats;
    format!(
        "keys: {}  updated: {}  unchanged: {}  skipped: {}  ({} ms{})",
        stats.records,
        stats.updated,
        stats.unchanged,
        stats.skipped,
        stats.time_ms,
        if report.options.dry_run {
            ", dry run"
        } else {
            ""
        }
    )
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyindex_indexer::{RecordError, ReindexOptions, ReindexStats};

    fn report(errors: Vec<RecordError>) -> ReindexReport {
        let mut stats = ReindexStats::new();
        stats.records = 3;
        stats.updated = 2;
        stats.skipped = errors.len();
        stats.errors = errors;
        ReindexReport {
            schema_version: 1,
            store: "/srv/keys".into(),
            scheme: "identity".into(),
            options: ReindexOptions {
                dry_run: false,
                concurrency: 1,
                save_unchanged: true,
            },
            stats,
        }
    }

    #[test]
    fn lists_skipped_keys() {
        let md = render_reindex_report(&report(vec![RecordError {
            fingerprint: "BBBB".into(),
            reason: "Malformed identity: \"a|b <x\"\nsecond line".into(),
        }]));
        assert!(md.contains("## Skipped keys"));
        assert!(md.contains("| `BBBB` | Malformed identity: \"a\\|b <x\" |"));
        assert!(!md.contains("second line"));
    }

    #[test]
    fn clean_run_has_no_skipped_section() {
        let md = render_reindex_report(&report(Vec::new()));
        assert!(!md.contains("Skipped keys"));
        assert!(render_summary_line(&report(Vec::new())).starts_with("keys: 3  updated: 2"));
    }

    #[test]
    fn truncates_long_reasons() {
        assert_eq!(truncate_one_line("abcdef", 4), "abc…");
        assert_eq!(truncate_one_line("abc", 4), "abc");
    }
}
