//! Bootloader configuration check for the FIPS kernel.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::CheckError;

pub const GRUB_CONFIG: &str = "/boot/grub/grub.cfg";

fn kernel_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"linux\t/boot/vmlinuz-\S+-fips root=UUID=\S* ro ")
            .expect("kernel pattern is valid")
    })
}

fn initrd_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"initrd\t/boot/initrd\.img-\S+-fips").expect("initrd pattern is valid")
    })
}

/// grub.cfg must boot a `-fips` kernel by root UUID with a matching initrd.
pub fn check_grub(content: &str) -> Result<(), CheckError> {
    let mut problems = Vec::new();
    if !kernel_line_regex().is_match(content) {
        problems.push("no 'linux /boot/vmlinuz-*-fips root=UUID=* ro' entry");
    }
    if !initrd_line_regex().is_match(content) {
        problems.push("no 'initrd /boot/initrd.img-*-fips' entry");
    }

    if problems.is_empty() {
        return Ok(());
    }

    let observed: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("linux") || l.starts_with("initrd"))
        .collect();

    Err(CheckError::PatternMismatch {
        path: GRUB_CONFIG.to_string(),
        reason: problems.join("; "),
        observed: observed.join(" | "),
    })
}
