//! Catalog consistency checks
//!
//! The catalog is static, so these checks guard against editing mistakes:
//! prices attached to modules that are not add-ons, add-ons nobody can buy,
//! and countries claimed by two regions.

use crate::modules::{modules, ModuleId};
use crate::regions::{regions, ModuleStatus, Region, RegionId};
use std::collections::HashSet;
use thiserror::Error;

/// Catalog inconsistency.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A price is recorded for a module that is not an add-on in that region
    #[error("{region}: {module} is priced but not an add-on")]
    PriceWithoutAddon { region: RegionId, module: ModuleId },

    /// An add-on module has no price in that region
    #[error("{region}: add-on {module} has no price")]
    AddonWithoutPrice { region: RegionId, module: ModuleId },

    /// Two catalog entries share an identifier
    #[error("duplicate module id: {0}")]
    DuplicateModule(ModuleId),

    /// A country appears in more than one region
    #[error("country {country} is claimed by both {first} and {second}")]
    CountryInTwoRegions {
        country: String,
        first: RegionId,
        second: RegionId,
    },
}

/// Check a single region's module strategy against its pricing.
pub fn validate_region(region: &Region) -> Vec<CatalogError> {
    let mut issues = Vec::new();

    for module in region.addon_pricing.keys() {
        if region.status(*module) != Some(ModuleStatus::Addon) {
            issues.push(CatalogError::PriceWithoutAddon {
                region: region.id,
                module: *module,
            });
        }
    }

    for module in region.modules_with_status(ModuleStatus::Addon) {
        if region.addon_price(module).is_none() {
            issues.push(CatalogError::AddonWithoutPrice {
                region: region.id,
                module,
            });
        }
    }

    issues
}

/// Validate the whole built-in catalog.
///
/// Returns the first inconsistency found; use [`catalog_issues`] to collect
/// all of them.
pub fn validate_catalog() -> Result<(), CatalogError> {
    match catalog_issues().into_iter().next() {
        Some(issue) => Err(issue),
        None => Ok(()),
    }
}

/// Collect every inconsistency in the built-in catalog.
pub fn catalog_issues() -> Vec<CatalogError> {
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    for module in modules() {
        if !seen.insert(module.id) {
            issues.push(CatalogError::DuplicateModule(module.id));
        }
    }

    let mut claimed: Vec<(&str, RegionId)> = Vec::new();
    for region in regions() {
        issues.extend(validate_region(region));

        for country in region.countries {
            let first = claimed
                .iter()
                .find(|(c, _)| c == country)
                .map(|(_, id)| *id);
            match first {
                Some(first) => issues.push(CatalogError::CountryInTwoRegions {
                    country: country.to_string(),
                    first,
                    second: region.id,
                }),
                None => claimed.push((*country, region.id)),
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn region_with(
        modules: &[(ModuleId, ModuleStatus)],
        pricing: &[(ModuleId, u32)],
    ) -> Region {
        let mut region = RegionId::Global.region().clone();
        region.modules = modules.iter().copied().collect::<BTreeMap<_, _>>();
        region.addon_pricing = pricing.iter().copied().collect::<BTreeMap<_, _>>();
        region
    }

    #[test]
    fn test_builtin_catalog_is_consistent() {
        assert_eq!(catalog_issues(), Vec::new());
        assert!(validate_catalog().is_ok());
    }

    #[test]
    fn test_price_on_core_module_is_flagged() {
        let region = region_with(
            &[(ModuleId::Pos, ModuleStatus::Core)],
            &[(ModuleId::Pos, 10)],
        );
        assert_eq!(
            validate_region(&region),
            vec![CatalogError::PriceWithoutAddon {
                region: RegionId::Global,
                module: ModuleId::Pos,
            }]
        );
    }

    #[test]
    fn test_unpriced_addon_is_flagged() {
        let region = region_with(&[(ModuleId::Crm, ModuleStatus::Addon)], &[]);
        assert_eq!(
            validate_region(&region),
            vec![CatalogError::AddonWithoutPrice {
                region: RegionId::Global,
                module: ModuleId::Crm,
            }]
        );
    }

    #[test]
    fn test_error_messages() {
        let err = CatalogError::AddonWithoutPrice {
            region: RegionId::Mena,
            module: ModuleId::Ior,
        };
        assert_eq!(err.to_string(), "mena: add-on ior has no price");
    }
}
