//! # Manual Ontology Configuration
//!
//! Curated corrections layered over the raw ontology:
//! - main cancer types (top-level groupings used for "same family" checks)
//! - adeno-squamous mappings (histological siblings of a combined type)
//! - additional parent edges missing from the source taxonomy
//! - parent edges to drop at construction
//! - neuroendocrine marker codes
//!
//! `ManualConfig::default()` carries the curated set. All fields default
//! individually, so a TOML override may specify any subset.

use crate::Code;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const MAIN_CANCER_CODES: &[&str] = &[
    "0050619", "0060119", "0080374", "119", "219", "263", "363", "734", "1245", "1324", "1325",
    "1380", "1521", "1612", "1725", "1781", "1793", "1964", "1993", "2394", "2596", "2998",
    "3277", "3571", "3953", "4159", "4362", "4607", "4960", "5041", "8564", "8649", "8850",
    "9256", "10283", "10534", "10811", "11054", "11239", "11615", "11819", "11920", "11934",
    "14110", "3068",
];

// (adeno-squamous, squamous, adeno)
const ADENO_SQUAMOUS: &[(&str, &str, &str)] = &[
    ("4829", "3907", "3910"),
    ("5623", "5514", "3458"),
    ("5624", "5537", "4896"),
    ("5625", "3748", "4914"),
    ("5626", "5530", "4923"),
    ("5627", "5535", "3500"),
    ("5628", "5527", "3502"),
    ("5629", "234", "5519"),
    ("5630", "6961", "6316"),
    ("5631", "5533", "2870"),
    ("5634", "10287", "2526"),
    ("5635", "5516", "5517"),
    ("5636", "3744", "3702"),
    ("5637", "0080323", "4074"),
    ("4830", "1749", "299"),
];

const ADDITIONAL_PARENTS: &[(&str, &str)] = &[
    ("4829", "3908"),
    ("6438", "6039"),
    ("7807", "6039"),
    ("6994", "6039"),
    ("6524", "6039"),
    ("6039", "1752"),
    ("1751", "1752"),
    ("234", "0050861"),
    ("1996", "0050861"),
    ("1520", "0080199"),
];

const EXCLUDED_RELATIONSHIPS: &[(&str, &str)] = &[("235", "1475")];

const NEUROENDOCRINE_CODES: &[&str] = &["169", "1800"];

/// A combined adeno-squamous type and its two histological siblings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdenoSquamousMapping {
    pub adeno_squamous: Code,
    pub squamous: Code,
    pub adeno: Code,
}

/// A child → parent edge removed from the source taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExcludedRelationship {
    pub child: Code,
    pub parent: Code,
}

/// Curated corrections applied when building an `OntologyGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    pub main_cancer_codes: BTreeSet<Code>,
    pub adeno_squamous_mappings: Vec<AdenoSquamousMapping>,
    pub additional_parents: BTreeMap<Code, BTreeSet<Code>>,
    pub excluded_relationships: Vec<ExcludedRelationship>,
    pub neuroendocrine_codes: BTreeSet<Code>,
}

impl ManualConfig {
    /// A configuration with no corrections at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            main_cancer_codes: BTreeSet::new(),
            adeno_squamous_mappings: Vec::new(),
            additional_parents: BTreeMap::new(),
            excluded_relationships: Vec::new(),
            neuroendocrine_codes: BTreeSet::new(),
        }
    }

    /// True if the edge `child → parent` must be dropped.
    #[must_use]
    pub fn is_excluded(&self, child: &str, parent: &str) -> bool {
        self.excluded_relationships
            .iter()
            .any(|r| r.child.as_str() == child && r.parent.as_str() == parent)
    }
}

impl Default for ManualConfig {
    fn default() -> Self {
        let mut additional_parents: BTreeMap<Code, BTreeSet<Code>> = BTreeMap::new();
        for (child, parent) in ADDITIONAL_PARENTS {
            additional_parents
                .entry(Code::from(*child))
                .or_default()
                .insert(Code::from(*parent));
        }

        Self {
            main_cancer_codes: MAIN_CANCER_CODES.iter().copied().map(Code::from).collect(),
            adeno_squamous_mappings: ADENO_SQUAMOUS
                .iter()
                .map(|(adeno_squamous, squamous, adeno)| AdenoSquamousMapping {
                    adeno_squamous: Code::from(*adeno_squamous),
                    squamous: Code::from(*squamous),
                    adeno: Code::from(*adeno),
                })
                .collect(),
            additional_parents,
            excluded_relationships: EXCLUDED_RELATIONSHIPS
                .iter()
                .map(|(child, parent)| ExcludedRelationship {
                    child: Code::from(*child),
                    parent: Code::from(*parent),
                })
                .collect(),
            neuroendocrine_codes: NEUROENDOCRINE_CODES.iter().copied().map(Code::from).collect(),
        }
    }
}
