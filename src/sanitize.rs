//! Isolates the JSON payload a language model embedded inside commentary,
//! markdown fences, or explanatory prefixes. Pure string transform; never
//! fails. When nothing JSON-like is found the trimmed input is returned and
//! the caller's parse step is expected to fail and trigger its fallback.

const FENCE: &str = "```";

/// Strips prose and fence artifacts around a model's JSON reply.
///
/// Runs of 3+ backticks are collapsed to one canonical fence, the longest
/// fenced region wins (models occasionally fence a short preamble before the
/// real payload), a leftover fence language tag is dropped, and in object
/// mode the result is sliced from the first `{` to the last `}` inclusive.
pub fn extract_payload(raw: &str, expect_object: bool) -> String {
    let collapsed = collapse_fence_runs(raw.trim());

    let mut cleaned = if collapsed.contains(FENCE) {
        let best = collapsed
            .split(FENCE)
            .map(str::trim)
            .max_by_key(|part| part.len())
            .unwrap_or("");
        if best.is_empty() {
            collapsed
        } else {
            strip_language_tag(best).to_string()
        }
    } else {
        collapsed
    };

    cleaned = cleaned.trim().to_string();

    if expect_object {
        if let (Some(first), Some(last)) = (cleaned.find('{'), cleaned.rfind('}')) {
            if first < last {
                cleaned = cleaned[first..=last].to_string();
            }
        }
    }

    cleaned.trim().to_string()
}

/// Drops the language tag a fence leaves behind ("```json\n{...") when the
/// remainder plainly starts a JSON value.
fn strip_language_tag(span: &str) -> &str {
    let rest = match span.strip_prefix("json").or_else(|| span.strip_prefix("JSON")) {
        Some(rest) => rest.trim_start(),
        None => return span,
    };
    if rest.starts_with('{') || rest.starts_with('[') {
        rest
    } else {
        span
    }
}

/// Normalizes any run of 3 or more backticks to a single 3-backtick marker.
fn collapse_fence_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut run = 0usize;
    for ch in input.chars() {
        if ch == '`' {
            run += 1;
            continue;
        }
        flush_backticks(&mut out, run);
        run = 0;
        out.push(ch);
    }
    flush_backticks(&mut out, run);
    out
}

fn flush_backticks(out: &mut String, run: usize) {
    if run >= 3 {
        out.push_str(FENCE);
    } else {
        for _ in 0..run {
            out.push('`');
        }
    }
}
