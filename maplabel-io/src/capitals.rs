use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};

use color_eyre::eyre::Result;

/// A flat file of one geonameid per line, the capitals membership set
/// from `original_source`'s `Capitals.txt`.
pub fn load_capitals<R: Read>(reader: R) -> Result<HashSet<String>> {
    let mut capitals = HashSet::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            capitals.insert(trimmed.to_owned());
        }
    }
    Ok(capitals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        let data = "123\n\n456\n  \n789\n";
        let capitals = load_capitals(data.as_bytes()).unwrap();
        assert_eq!(capitals.len(), 3);
        assert!(capitals.contains("456"));
    }
}
