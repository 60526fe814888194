//! Export formatting for entry sequences.
//!
//! Pure string-building over an already filtered and sorted entry
//! slice; presentation-adjacent, not part of the scan core.

use markscan_core::Entry;

/// Render entries as an aligned terminal table.
pub fn to_table(entries: &[&Entry]) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let location_width = entries
        .iter()
        .map(|e| e.path.to_string_lossy().len() + 1 + digits(e.line + 1))
        .max()
        .unwrap_or(0);
    let kind_width = entries.iter().map(|e| e.kind.len()).max().unwrap_or(0);

    let mut output = String::new();
    for entry in entries {
        let location = format!("{}:{}", entry.path.display(), entry.line + 1);
        output.push_str(&format!(
            "{location:<location_width$}  {kind:<kind_width$}  {text}\n",
            kind = entry.kind,
            text = entry.text,
        ));
    }
    output
}

/// Render entries as a Markdown checklist grouped by file.
pub fn to_markdown(entries: &[&Entry]) -> String {
    let mut output = String::from("# Markers\n");

    let mut current_file: Option<&std::path::Path> = None;
    for entry in entries {
        if current_file != Some(entry.path.as_path()) {
            output.push_str(&format!("\n## {}\n\n", entry.path.display()));
            current_file = Some(entry.path.as_path());
        }
        output.push_str(&format!(
            "- [ ] **{}** {} (line {})\n",
            entry.kind,
            entry.text,
            entry.line + 1
        ));
    }

    output
}

/// Render entries as pretty-printed JSON.
pub fn to_json(entries: &[&Entry]) -> String {
    serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string())
}

/// Render entries as CSV with a header row.
pub fn to_csv(entries: &[&Entry]) -> String {
    let mut output = String::from("path,line,kind,text,line_text\n");
    for entry in entries {
        output.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&entry.path.to_string_lossy()),
            entry.line,
            csv_field(&entry.kind),
            csv_field(&entry.text),
            csv_field(&entry.line_text),
        ));
    }
    output
}

/// Quote a CSV field when it contains a separator, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
