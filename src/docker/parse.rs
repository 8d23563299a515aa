// ABOUTME: Parsers for the output of the docker-mailserver `setup` command line tool

use crate::models::{AliasListResponse, AliasResponse};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `* alias@example.com user@example.com`
    static ref ALIAS_LINE: Regex = Regex::new(r".*\* *([^\s]+) +([^\s]+)").unwrap();
    // `* user@example.com ( 12K / ~ ) [0%]`
    static ref EMAIL_LINE: Regex = Regex::new(r"\*\s*(.*?)\s*\(").unwrap();
    static ref ADDRESS: Regex = Regex::new(r"^[^\s@<>]+@[^\s@<>]+$").unwrap();
}

/// Whether `address` is a bare `local@domain` mail address.
pub fn is_valid_address(address: &str) -> bool {
    ADDRESS.is_match(address)
}

/// Parses `setup email list`, keeping valid addresses only.
pub fn parse_email_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| EMAIL_LINE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .filter(|email| is_valid_address(email))
        .collect()
}

/// Parses `setup alias list`; lines whose alias or target is not a valid
/// address are skipped.
pub fn parse_alias_list(output: &str) -> AliasListResponse {
    let aliases = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| ALIAS_LINE.captures(line))
        .filter_map(|caps| match (caps.get(1), caps.get(2)) {
            (Some(alias), Some(email)) => Some(AliasResponse::new(alias.as_str(), email.as_str())),
            _ => None,
        })
        .filter(|a| is_valid_address(&a.alias) && is_valid_address(&a.email))
        .collect();

    AliasListResponse { aliases }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_email_list() {
        let output = "\
* user1@example.com ( 12K / ~ ) [0%]
* user2@example.com ( 0 / ~ ) [0%]
* not-an-address ( 0 / ~ ) [0%]
Some header line
";
        assert_eq!(
            parse_email_list(output),
            vec!["user1@example.com", "user2@example.com"]
        );
    }

    #[test]
    fn test_parse_email_list_empty_output() {
        assert!(parse_email_list("").is_empty());
    }

    #[test]
    fn test_parse_alias_list() {
        let output = "
  * alias1@example.com user1@example.com

* alias2@example.com   user2@example.com
* broken user3@example.com
garbage
";
        let parsed = parse_alias_list(output);
        assert_eq!(
            parsed.aliases,
            vec![
                AliasResponse::new("alias1@example.com", "user1@example.com"),
                AliasResponse::new("alias2@example.com", "user2@example.com"),
            ]
        );
    }

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("info@example.com"));
        assert!(is_valid_address("a@localhost"));
        assert!(!is_valid_address("info@"));
        assert!(!is_valid_address("@example.com"));
        assert!(!is_valid_address("two words@example.com"));
        assert!(!is_valid_address("a@b@c"));
        assert!(!is_valid_address(""));
    }
}
