//! Platform scenarios for the installed package comparison.
//!
//! Each scenario names the platforms it applies to. The matrix is checked at
//! construction: every platform must be covered by exactly one scenario, so
//! adding a platform without deciding its package set is an error instead of
//! a silently skipped comparison.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::assets::{self, PackageSetLoader};
use crate::error::{CheckError, MatrixError};
use crate::packages::PackageSet;
use crate::platform::Platform;

/// One package comparison: which platforms it applies to and which
/// platform addendum (if any) is added to the base and FIPS lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub name: String,
    pub platforms: BTreeSet<Platform>,
    pub addendum: Option<Platform>,
}

impl Scenario {
    pub fn new(name: &str, platforms: &[Platform], addendum: Option<Platform>) -> Self {
        Self {
            name: name.to_string(),
            platforms: platforms.iter().copied().collect(),
            addendum,
        }
    }

    /// True if this scenario runs on `platform`.
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Asset names making up the expected set, in composition order.
    pub fn asset_names(&self, os: &str) -> Vec<String> {
        let mut names = vec![assets::base_list(os), assets::fips_list(os)];
        if let Some(platform) = self.addendum {
            names.push(assets::additions_list(os, platform));
        }
        names
    }

    /// Expected package set: base ∪ fips ∪ optional addendum.
    pub fn expected(
        &self,
        loader: &dyn PackageSetLoader,
        os: &str,
    ) -> Result<PackageSet, CheckError> {
        let mut expected = PackageSet::new();
        for name in self.asset_names(os) {
            let list = loader.load(&name)?;
            expected.extend_from(&list);
        }
        debug!(
            scenario = %self.name,
            packages = expected.len(),
            "assembled expected package set"
        );
        Ok(expected)
    }
}

/// The set of scenarios, partitioning every known platform.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioMatrix {
    scenarios: Vec<Scenario>,
}

impl ScenarioMatrix {
    /// Build a matrix, rejecting uncovered or doubly covered platforms.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, MatrixError> {
        for platform in Platform::ALL {
            let mut owners = scenarios.iter().filter(|s| s.applies_to(platform));
            let first = owners.next().ok_or(MatrixError::Uncovered(platform))?;
            if let Some(second) = owners.next() {
                return Err(MatrixError::Overlap {
                    platform,
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }
        Ok(Self { scenarios })
    }

    /// The FIPS stemcell matrix.
    ///
    /// vcloud shares the vsphere addendum. alicloud, aws, openstack and
    /// warden install nothing beyond base and FIPS.
    pub fn standard() -> Self {
        use Platform::*;

        let scenarios = vec![
            Scenario::new("base", &[Alicloud, Aws, Openstack, Warden], None),
            Scenario::new("google", &[Google], Some(Google)),
            Scenario::new("vsphere", &[Vsphere, Vcloud], Some(Vsphere)),
            Scenario::new("azure", &[Azure], Some(Azure)),
            Scenario::new("cloudstack", &[Cloudstack], Some(Cloudstack)),
            Scenario::new("softlayer", &[Softlayer], Some(Softlayer)),
        ];

        Self::new(scenarios).expect("standard matrix covers every platform exactly once")
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Scenarios that apply to `platform`. At most one for a valid matrix.
    pub fn applicable(&self, platform: Platform) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(move |s| s.applies_to(platform))
    }

    /// The single scenario for `platform`.
    pub fn active(&self, platform: Platform) -> Result<&Scenario, CheckError> {
        self.applicable(platform)
            .next()
            .ok_or(CheckError::NoScenarioApplicable { platform })
    }
}
