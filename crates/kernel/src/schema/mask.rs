//! Wildcard format masks.
//!
//! A mask is scanned as runs of identical characters:
//! - `X` run of n: exactly n digits
//! - `A` run of n: exactly n ASCII letters
//! - `*` run of any length: one or more of anything (greedy)
//! - anything else: the literal run, escaped
//!
//! The compiled pattern is anchored at both ends.

/// Compile a mask into a regex source. An empty mask yields an empty string.
pub fn compile_format(format: &str) -> String {
    if format.is_empty() {
        return String::new();
    }

    let mut out = String::from("^");
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        let mut run = 1usize;
        while chars.next_if_eq(&ch).is_some() {
            run += 1;
        }

        match ch {
            'X' => push_class(&mut out, "[0-9]", run),
            'A' => push_class(&mut out, "[A-Za-z]", run),
            '*' => out.push_str(".+"),
            _ => out.push_str(&regex::escape(&ch.to_string().repeat(run))),
        }
    }

    out.push('$');
    out
}

fn push_class(out: &mut String, class: &str, run: usize) {
    out.push_str(class);
    if run > 1 {
        out.push_str(&format!("{{{run}}}"));
    }
}
