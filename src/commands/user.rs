//! `gitea-provision user <op>` - run a lifecycle operation over declared users

use crate::Context;
use crate::cli::{UserArgs, UserCommand};
use crate::config::ProviderConfig;
use crate::paths;
use crate::provider::Provider;
use crate::resource::user;
use crate::ui;
use anyhow::{Context as _, Result, bail};
use declarative::{BatchSummary, Operation, Outcome, ResourceData, Schema, Value, execute_batch};
use std::fs;
use std::path::Path;

pub fn run(ctx: &Context, cmd: UserCommand) -> Result<()> {
    let (op, args) = match cmd {
        UserCommand::Create(args) => (Operation::Create, args),
        UserCommand::Read(args) => (Operation::Read, args),
        UserCommand::Update(args) => (Operation::Update, args),
        UserCommand::Delete(args) => (Operation::Delete, args),
    };
    apply(ctx, op, &args)
}

fn apply(ctx: &Context, op: Operation, args: &UserArgs) -> Result<()> {
    let config_path = match &ctx.config {
        Some(path) => paths::expand(path),
        None => paths::config_file()?,
    };
    let provider = Provider::new(ProviderConfig::load(&config_path)?)?;
    let resource = provider.resource(user::TYPE_NAME)?;

    let decl_path = paths::expand(&args.file);
    let items = load_declarations(&decl_path, &resource.schema())?;
    if items.is_empty() {
        if !ctx.quiet {
            ui::warn(&format!("No [[user]] entries in {}", decl_path.display()));
        }
        return Ok(());
    }

    let labels: Vec<String> = items.iter().map(label).collect();
    log::info!(
        "{} {} user(s) against {}",
        op,
        items.len(),
        provider.config().base_url
    );

    let results = execute_batch(resource.as_ref(), op, items, args.jobs.max(1))?;

    for ((data, outcome), name) in results.iter().zip(&labels) {
        report(ctx, op, name, data, outcome)?;
    }

    let summary: BatchSummary = results.iter().map(|(_, o)| o).collect();
    if !ctx.quiet {
        ui::dim(&format!(
            "{} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
    }
    if !summary.is_success() {
        bail!("{} of {} {} operations failed", summary.failed, summary.total(), op);
    }
    Ok(())
}

fn report(
    ctx: &Context,
    op: Operation,
    name: &str,
    data: &ResourceData,
    outcome: &Outcome,
) -> Result<()> {
    match outcome {
        Outcome::Failed { error } => ui::error(&format!("{op} {name}: {error}")),
        _ => {
            if !ctx.quiet {
                ui::success(&format!("{op} {name}"));
            }
            if data.has_tracked() {
                println!("{}", serde_json::to_string_pretty(data)?);
            }
        }
    }
    Ok(())
}

/// Display name for a declaration: username, else login
fn label(data: &ResourceData) -> String {
    data.get_str("username")
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| data.get_str("login").ok())
        .unwrap_or_else(|| "<unnamed>".to_string())
}

/// Read `[[user]]` tables from a TOML declaration file
pub fn load_declarations(path: &Path, schema: &Schema) -> Result<Vec<ResourceData>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    parse_declarations(&content, schema)
        .with_context(|| format!("Invalid declarations in {}", path.display()))
}

fn parse_declarations(content: &str, schema: &Schema) -> Result<Vec<ResourceData>> {
    let table: toml::Table = toml::from_str(content)?;

    if let Some(key) = table.keys().find(|k| k.as_str() != "user") {
        bail!("unexpected top-level key: {key}");
    }

    let Some(users) = table.get("user") else {
        return Ok(Vec::new());
    };
    let users = users
        .as_array()
        .context("`user` must be an array of tables ([[user]])")?;

    users
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry
                .as_table()
                .with_context(|| format!("user #{index} is not a table"))?;
            let values = entry
                .iter()
                .map(|(key, value)| Ok((key.clone(), to_value(key, value)?)))
                .collect::<Result<Vec<_>>>()?;
            ResourceData::from_desired(schema.clone(), values)
                .with_context(|| format!("user #{index}"))
        })
        .collect()
}

fn to_value(key: &str, value: &toml::Value) -> Result<Value> {
    match value {
        toml::Value::String(s) => Ok(Value::String(s.clone())),
        toml::Value::Boolean(b) => Ok(Value::Bool(*b)),
        toml::Value::Integer(i) => Ok(Value::Int(*i)),
        other => bail!("field {key} has unsupported type {}", other.type_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::DataError;
    use tempfile::TempDir;

    const USERS: &str = r#"
[[user]]
login = "alice"
full_name = "Alice Liddell"
email = "alice@example.com"
username = "alice"
password = "wonderland"
is_admin = true

[[user]]
login = "bob"
full_name = "Bob"
email = "bob@example.com"
password = "builder"
"#;

    #[test]
    fn test_parse_declarations() {
        let items = parse_declarations(USERS, &user::schema()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].get_str("username").unwrap(), "alice");
        assert!(items[0].get_bool("is_admin").unwrap());
        assert!(!items[1].get_bool("is_admin").unwrap());
        assert!(items.iter().all(|d| d.validate().is_ok()));
    }

    #[test]
    fn test_labels() {
        let items = parse_declarations(USERS, &user::schema()).unwrap();
        assert_eq!(label(&items[0]), "alice");
        assert_eq!(label(&items[1]), "bob");
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_declarations("", &user::schema()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_computed_field() {
        let err = parse_declarations(
            "[[user]]\nlogin = \"x\"\ngitea_id = 3\n",
            &user::schema(),
        )
        .unwrap_err();

        let root = err.root_cause().downcast_ref::<DataError>();
        assert_eq!(root, Some(&DataError::Computed("gitea_id".into())));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let err =
            parse_declarations("[[user]]\nis_admin = \"yes\"\n", &user::schema()).unwrap_err();
        assert!(format!("{err:#}").contains("is_admin"));
    }

    #[test]
    fn test_parse_rejects_unsupported_value() {
        let err =
            parse_declarations("[[user]]\nlogin = [\"a\"]\n", &user::schema()).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported type array"));
    }

    #[test]
    fn test_parse_rejects_unknown_top_level() {
        let err = parse_declarations("[org]\nname = \"x\"\n", &user::schema()).unwrap_err();
        assert!(err.to_string().contains("org"));
    }

    #[test]
    fn test_load_declarations_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("users.toml");
        fs::write(&path, USERS).unwrap();

        let items = load_declarations(&path, &user::schema()).unwrap();
        assert_eq!(items.len(), 2);

        let err = load_declarations(&tmp.path().join("missing.toml"), &user::schema())
            .unwrap_err();
        assert!(err.to_string().contains("Could not read"));
    }
}
