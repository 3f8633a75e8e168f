use std::{collections::HashSet, fs, path::Path};

use crate::Error;

/// Reads the address list at `path`: one entry per line, surrounding
/// whitespace trimmed, blank lines dropped, duplicates collapsed. `\n`,
/// `\r\n` and a lone `\r` all end a line. Entries keep the order in which
/// they first appear.
pub fn load_addresses(path: &str) -> Result<Vec<String>, Error> {
    if !Path::new(path).exists() {
        return Err(Error::input_not_found(path));
    }

    let content = fs::read_to_string(path).map_err(|err| Error::input_unreadable(path, err))?;
    let addresses = parse_addresses(&content);
    debug!("{} unique addresses in {}", addresses.len(), path);

    if addresses.is_empty() {
        return Err(Error::NoAddresses);
    }
    Ok(addresses)
}

pub fn parse_addresses(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_owned)
        .collect()
}
