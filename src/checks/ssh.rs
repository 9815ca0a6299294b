//! sshd hardening checks.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CheckError;

pub const SSHD_CONFIG: &str = "/etc/ssh/sshd_config";

/// Approved MAC algorithms, in the order sshd must list them.
pub const APPROVED_MACS: [&str; 4] = [
    "hmac-sha2-512-etm@openssh.com",
    "hmac-sha2-256-etm@openssh.com",
    "hmac-sha2-512",
    "hmac-sha2-256",
];

/// The only host keys sshd may load.
pub const HOST_KEYS: [&str; 2] = [
    "HostKey /etc/ssh/ssh_host_rsa_key",
    "HostKey /etc/ssh/ssh_host_ecdsa_key",
];

fn macs_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let line = format!("MACs {}", APPROVED_MACS.join(","));
        Regex::new(&format!("(?m)^{}$", regex::escape(&line))).expect("MACs pattern is valid")
    })
}

fn host_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^HostKey.*").expect("HostKey pattern is valid"))
}

/// A line must read exactly `MACs <approved list>`. Order matters.
pub fn check_macs(content: &str) -> Result<(), CheckError> {
    if macs_regex().is_match(content) {
        return Ok(());
    }

    let observed: Vec<&str> = content
        .lines()
        .filter(|l| l.starts_with("MACs"))
        .collect();

    Err(CheckError::PatternMismatch {
        path: SSHD_CONFIG.to_string(),
        reason: format!("expected line 'MACs {}'", APPROVED_MACS.join(",")),
        observed: if observed.is_empty() {
            "no MACs line".to_string()
        } else {
            observed.join(" | ")
        },
    })
}

/// The `HostKey` lines, taken as a set, must be exactly [`HOST_KEYS`].
pub fn check_host_keys(content: &str) -> Result<(), CheckError> {
    let found: BTreeSet<&str> = host_key_regex()
        .find_iter(content)
        .map(|m| m.as_str())
        .collect();
    let expected: BTreeSet<&str> = HOST_KEYS.iter().copied().collect();

    if found == expected {
        return Ok(());
    }

    let missing: Vec<&str> = expected.difference(&found).copied().collect();
    let unexpected: Vec<&str> = found.difference(&expected).copied().collect();

    let mut reason = String::from("host keys must be exactly RSA and ECDSA");
    if !missing.is_empty() {
        reason.push_str(&format!("; missing: {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        reason.push_str(&format!("; unexpected: {}", unexpected.join(", ")));
    }

    Err(CheckError::PatternMismatch {
        path: SSHD_CONFIG.to_string(),
        reason,
        observed: found.into_iter().collect::<Vec<_>>().join(" | "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACS_LINE: &str = "MACs hmac-sha2-512-etm@openssh.com,hmac-sha2-256-etm@openssh.com,hmac-sha2-512,hmac-sha2-256";

    #[test]
    fn test_macs_exact_line_passes() {
        let content = format!("Port 22\n{}\nPermitRootLogin no\n", MACS_LINE);
        assert!(check_macs(&content).is_ok());
    }

    #[test]
    fn test_macs_reordered_fails() {
        let content = "MACs hmac-sha2-256-etm@openssh.com,hmac-sha2-512-etm@openssh.com,hmac-sha2-512,hmac-sha2-256\n";
        let err = check_macs(content).unwrap_err();
        assert!(err.details().unwrap().contains("hmac-sha2-256-etm@openssh.com,hmac-sha2-512-etm"));
    }

    #[test]
    fn test_macs_extra_algorithm_fails() {
        let content = format!("{},hmac-sha1\n", MACS_LINE);
        assert!(check_macs(&content).is_err());
    }

    #[test]
    fn test_macs_must_start_line() {
        let content = format!("# {}\n", MACS_LINE);
        assert!(check_macs(&content).is_err());
    }

    #[test]
    fn test_macs_missing_line_reported() {
        let err = check_macs("Port 22\n").unwrap_err();
        assert_eq!(err.details().unwrap(), "observed: no MACs line");
    }

    #[test]
    fn test_host_keys_any_order() {
        let content = "HostKey /etc/ssh/ssh_host_ecdsa_key\nPort 22\nHostKey /etc/ssh/ssh_host_rsa_key\n";
        assert!(check_host_keys(content).is_ok());
    }

    #[test]
    fn test_host_keys_extra_key_fails() {
        let content = "HostKey /etc/ssh/ssh_host_rsa_key\n\
                       HostKey /etc/ssh/ssh_host_ecdsa_key\n\
                       HostKey /etc/ssh/ssh_host_ed25519_key\n";
        let err = check_host_keys(content).unwrap_err();
        assert!(err.to_string().contains("unexpected: HostKey /etc/ssh/ssh_host_ed25519_key"));
    }

    #[test]
    fn test_host_keys_missing_key_fails() {
        let err = check_host_keys("HostKey /etc/ssh/ssh_host_rsa_key\n").unwrap_err();
        assert!(err.to_string().contains("missing: HostKey /etc/ssh/ssh_host_ecdsa_key"));
    }

    #[test]
    fn test_host_keys_commented_lines_ignored() {
        let content = "#HostKey /etc/ssh/ssh_host_ed25519_key\n\
                       HostKey /etc/ssh/ssh_host_rsa_key\n\
                       HostKey /etc/ssh/ssh_host_ecdsa_key\n";
        assert!(check_host_keys(content).is_ok());
    }
}
