//! Infrastructure platforms a stemcell can be built for.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::Serialize;

/// Target infrastructure of a stemcell build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Alicloud,
    Aws,
    Azure,
    Cloudstack,
    Google,
    Openstack,
    Softlayer,
    Vcloud,
    Vsphere,
    Warden,
}

impl Platform {
    /// Every known platform, in name order.
    pub const ALL: [Platform; 10] = [
        Platform::Alicloud,
        Platform::Aws,
        Platform::Azure,
        Platform::Cloudstack,
        Platform::Google,
        Platform::Openstack,
        Platform::Softlayer,
        Platform::Vcloud,
        Platform::Vsphere,
        Platform::Warden,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Alicloud => "alicloud",
            Platform::Aws => "aws",
            Platform::Azure => "azure",
            Platform::Cloudstack => "cloudstack",
            Platform::Google => "google",
            Platform::Openstack => "openstack",
            Platform::Softlayer => "softlayer",
            Platform::Vcloud => "vcloud",
            Platform::Vsphere => "vsphere",
            Platform::Warden => "warden",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        match Platform::ALL.iter().find(|p| p.as_str() == wanted) {
            Some(platform) => Ok(*platform),
            None => {
                let known: Vec<&str> = Platform::ALL.iter().map(|p| p.as_str()).collect();
                bail!("Unknown platform '{}' (expected one of: {})", s, known.join(", "))
            }
        }
    }
}
