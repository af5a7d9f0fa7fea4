//! Utilities for the deploy script.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
};

use alloy::primitives::{Address, U256};
use json::JsonValue;

use crate::{
    constants::{DEPLOYMENTS_KEY, ETHER_DECIMALS},
    errors::ScriptError,
};

/// Formats an amount of wei as a decimal amount of ether.
///
/// Trailing zeros of the fractional part are trimmed, but at least one
/// fractional digit is always kept, so one ether renders as `1.0`.
pub fn format_ether(wei: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(ETHER_DECIMALS));
    let (whole, fraction) = wei.div_rem(unit);

    let fraction = format!("{:0>width$}", fraction.to_string(), width = ETHER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    let fraction = if fraction.is_empty() { "0" } else { fraction };

    format!("{whole}.{fraction}")
}

/// Reads and parses the JSON file at the given path
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Parses a previously recorded contract address from the deployments file
#[cfg(test)]
fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    let addr = parsed_json[DEPLOYMENTS_KEY][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadDeployments(format!(
                "no address recorded for `{contract_key}` in deployments file"
            ))
        })?;

    addr.parse::<Address>().map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Records a deployed contract address in the deployments file, creating the
/// file if it doesn't exist
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    // Indexing into a non-object would silently replace it
    if !parsed_json.is_object() {
        return Err(ScriptError::WriteDeployments(format!(
            "{} is not a JSON object",
            file_path.display()
        )));
    }
    let deployments = &parsed_json[DEPLOYMENTS_KEY];
    if !(deployments.is_object() || deployments.is_null()) {
        return Err(ScriptError::WriteDeployments(format!(
            "`{DEPLOYMENTS_KEY}` in {} is not a JSON object",
            file_path.display()
        )));
    }

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, U256};

    use super::*;

    #[test]
    fn test_format_one_ether() {
        let wei = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(format_ether(wei), "1.0");
    }

    #[test]
    fn test_format_fractional_ether() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(U256::from(1_500_000_000_000_000_000u128)), "1.5");
        assert_eq!(
            format_ether(U256::from(10_000_250_000_000_000_000_000u128)),
            "10000.25"
        );
    }

    #[test]
    fn test_write_deployed_address_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        let addr = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

        write_deployed_address(&path, "CustomBetting", addr).unwrap();

        let parsed = parse_addr_from_deployments_file(&path, "CustomBetting").unwrap();
        assert_eq!(parsed, addr);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("0x5fbdb2315678afecb367f032d93f642f64180aa3"));
    }

    #[test]
    fn test_write_deployed_address_preserves_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(
            &path,
            r#"{"deployments":{"Token":"0x0000000000000000000000000000000000000001"},"chain":31337}"#,
        )
        .unwrap();

        let addr = Address::repeat_byte(0xab);
        write_deployed_address(&path, "CustomBetting", addr).unwrap();

        let parsed = get_json_from_file(&path).unwrap();
        assert_eq!(parsed["chain"].as_u64(), Some(31337));
        assert_eq!(
            parse_addr_from_deployments_file(&path, "Token").unwrap(),
            Address::with_last_byte(1)
        );
        assert_eq!(
            parse_addr_from_deployments_file(&path, "CustomBetting").unwrap(),
            addr
        );
    }

    #[test]
    fn test_write_deployed_address_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let addr = Address::repeat_byte(0x01);

        let array_path = dir.path().join("array.json");
        fs::write(&array_path, r#"[{"keep":"me"}]"#).unwrap();
        let err = write_deployed_address(&array_path, "CustomBetting", addr).unwrap_err();
        assert!(matches!(err, ScriptError::WriteDeployments(_)));
        assert_eq!(fs::read_to_string(&array_path).unwrap(), r#"[{"keep":"me"}]"#);

        let nested_path = dir.path().join("nested.json");
        let nested = r#"{"deployments":["0x0000000000000000000000000000000000000001"]}"#;
        fs::write(&nested_path, nested).unwrap();
        let err = write_deployed_address(&nested_path, "CustomBetting", addr).unwrap_err();
        assert!(matches!(err, ScriptError::WriteDeployments(_)));
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), nested);
    }

    #[test]
    fn test_missing_deployment_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deployments.json");
        fs::write(&path, "{}").unwrap();

        let err = parse_addr_from_deployments_file(&path, "CustomBetting").unwrap_err();
        assert!(matches!(err, ScriptError::ReadDeployments(_)));
    }
}
