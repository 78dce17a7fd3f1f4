//! `gitea-provision schema` - print resource schemas

use crate::provider::{self, RESOURCE_TYPES};
use anyhow::{Result, bail};
use std::collections::BTreeMap;

pub fn run(resource: Option<&str>) -> Result<()> {
    println!("{}", render(resource)?);
    Ok(())
}

fn render(resource: Option<&str>) -> Result<String> {
    match resource {
        Some(name) => match provider::schema_for(name) {
            Some(schema) => Ok(serde_json::to_string_pretty(&schema)?),
            None => bail!(
                "unknown resource type: {name} (known: {})",
                RESOURCE_TYPES.join(", ")
            ),
        },
        None => {
            let all: BTreeMap<_, _> = RESOURCE_TYPES
                .iter()
                .filter_map(|name| provider::schema_for(name).map(|s| (*name, s)))
                .collect();
            Ok(serde_json::to_string_pretty(&all)?)
        }
    }
}
