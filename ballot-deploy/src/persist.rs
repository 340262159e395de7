// Copyright (c) 2022 MASSA LABS <info@massa.net>

use anyhow::{Context, Result};
use ballot_models::address::Address;
use std::fs;
use std::path::Path;
use toml_edit::{value, Document};

/// Write the contract addresses into the `[contracts]` table of `path`.
/// The rest of the file, comments included, is kept as is. A missing file is created.
pub(crate) fn persist_contracts(path: &Path, whitelist: Address, voting: Address) -> Result<()> {
    let content = if path.is_file() {
        fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?
    } else {
        String::new()
    };
    let mut doc = content
        .parse::<Document>()
        .with_context(|| format!("{} is not valid TOML", path.display()))?;

    doc["contracts"]["whitelist"] = value(whitelist.to_string());
    doc["contracts"]["voting"] = value(voting.to_string());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, doc.to_string()).with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_keeps_the_rest_of_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "# local node\n[rpc]\nurl = \"http://127.0.0.1:8545\" # hardhat\n\n[contracts]\nwhitelist = \"\"\nvoting = \"\"\n",
        )
        .unwrap();
        let whitelist = Address::from_bytes([0x11; 20]);
        let voting = Address::from_bytes([0x22; 20]);

        persist_contracts(&path, whitelist, voting).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# local node\n[rpc]\nurl = \"http://127.0.0.1:8545\" # hardhat\n"));
        let doc = written.parse::<Document>().unwrap();
        assert_eq!(doc["contracts"]["whitelist"].as_str(), Some(whitelist.to_string().as_str()));
        assert_eq!(doc["contracts"]["voting"].as_str(), Some(voting.to_string().as_str()));
        assert_eq!(doc["rpc"]["url"].as_str(), Some("http://127.0.0.1:8545"));
    }

    #[test]
    fn test_persist_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("config.toml");
        let whitelist = Address::from_bytes([0x11; 20]);
        let voting = Address::from_bytes([0x22; 20]);

        persist_contracts(&path, whitelist, voting).unwrap();

        let doc = fs::read_to_string(&path).unwrap().parse::<Document>().unwrap();
        assert_eq!(doc["contracts"]["voting"].as_str(), Some(voting.to_string().as_str()));
    }
}
