use crate::paths::Sequence;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load sequences from a path file
///
/// # Format
/// One path per line, entities separated by commas. When `weighted` is set,
/// the last field of each line is the path's observation count:
///
/// ```text
/// # itineraries
/// a,b,c,12
/// a,b,d,3
/// ```
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// Returns error if the file cannot be read or a weight field is malformed.
pub fn read_paths<P: AsRef<Path>>(path: P, weighted: bool) -> Result<Vec<Sequence>> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read path file: {}", path.as_ref().display()))?;

    parse_paths(&content, weighted)
        .with_context(|| format!("Failed to parse path file: {}", path.as_ref().display()))
}

/// Parse sequences from path file content (see [`read_paths`])
pub fn parse_paths(content: &str, weighted: bool) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let weight = if weighted {
            let field = fields
                .pop()
                .with_context(|| format!("Line {}: missing weight field", idx + 1))?;
            field
                .parse::<f64>()
                .with_context(|| format!("Line {}: invalid weight '{}'", idx + 1, field))?
        } else {
            1.0
        };

        if fields.iter().any(|f| f.is_empty()) {
            anyhow::bail!("Line {}: empty entity identifier", idx + 1);
        }

        sequences.push(Sequence::new(fields).with_weight(weight));
    }

    Ok(sequences)
}
