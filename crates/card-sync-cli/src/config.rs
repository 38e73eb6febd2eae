use std::path::Path;

use anyhow::{Context, Result};
use card_sync::apply::Mode;
use card_sync::sync::SyncOptions;
use serde::Deserialize;
use tracing::info;

use crate::{ConnectionArgs, SyncArgs};

pub const DEFAULT_LABEL: &str = "synced";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigAccounts {
    pub primary: Option<String>,
    pub additional: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSync {
    pub label: Option<String>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigApi {
    pub url: Option<String>,
}

/// Settings file. Every value in it can be overridden by a flag or an environment variable.
///
/// The API token is deliberately not part of it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub accounts: ConfigAccounts,
    #[serde(default)]
    pub sync: ConfigSync,
    #[serde(default)]
    pub api: ConfigApi,
}

impl ConfigFile {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ConfigFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Using config file {}", path.display());
        Ok(config)
    }

    pub fn find_and_load() -> Result<Option<Self>> {
        let config_locations = [Path::new("card-sync.toml"), Path::new(".card-sync.toml")];

        for location in &config_locations {
            if location.exists() {
                return Self::load_from_file(location).map(Some);
            }
        }

        Ok(None)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Connection {
    pub token: String,
    pub api_url: String,
}

/// `DRY_RUN` semantics: only the word `false`, in any casing, turns the dry run off.
pub fn parse_dry_run(value: &str) -> Result<bool, std::convert::Infallible> {
    Ok(!value.trim().eq_ignore_ascii_case("false"))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn required(value: Option<String>, name: &str, missing: &mut Vec<String>) -> String {
    present(value).unwrap_or_else(|| {
        missing.push(name.to_string());
        String::new()
    })
}

fn connection(args: ConnectionArgs, file: &ConfigFile, missing: &mut Vec<String>) -> Connection {
    let token = required(
        present(args.token).or(args.bearer_token),
        "MONARCH_API_TOKEN (or MONARCH_BEARER_TOKEN)",
        missing,
    );
    let api_url = present(args.api_url)
        .or_else(|| present(file.api.url.clone()))
        .unwrap_or_else(|| card_sync_monarch::DEFAULT_API_URL.to_string());

    Connection { token, api_url }
}

pub fn sync_label(label: Option<String>, file: &ConfigFile) -> String {
    present(label)
        .or_else(|| present(file.sync.label.clone()))
        .unwrap_or_else(|| DEFAULT_LABEL.to_string())
}

pub fn resolve_connection(
    args: ConnectionArgs,
    file: &ConfigFile,
) -> card_sync::Result<Connection> {
    let mut missing = Vec::new();
    let connection = connection(args, file, &mut missing);

    if missing.is_empty() {
        Ok(connection)
    } else {
        Err(card_sync::Error::Configuration { missing })
    }
}

/// Merge flags and environment (already combined by clap) over the config file.
///
/// All missing required settings are reported together.
pub fn resolve_sync(
    connection_args: ConnectionArgs,
    args: SyncArgs,
    file: &ConfigFile,
) -> card_sync::Result<(Connection, SyncOptions)> {
    let mut missing = Vec::new();

    let primary_account = required(
        present(args.primary_account).or_else(|| file.accounts.primary.clone()),
        "MAIN_ACCOUNT_ID",
        &mut missing,
    );
    let additional_account = required(
        present(args.additional_account).or_else(|| file.accounts.additional.clone()),
        "ADDL_ACCOUNT_ID",
        &mut missing,
    );
    let connection = connection(connection_args, file, &mut missing);

    if !missing.is_empty() {
        return Err(card_sync::Error::Configuration { missing });
    }

    let dry_run = args.dry_run.or(file.sync.dry_run).unwrap_or(true);
    let options = SyncOptions {
        primary_account,
        additional_account,
        label: sync_label(args.label, file),
        mode: Mode::from_dry_run(dry_run),
    };
    Ok((connection, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> ConfigFile {
        toml::from_str(contents).unwrap()
    }

    fn full_args() -> (ConnectionArgs, SyncArgs) {
        (
            ConnectionArgs {
                token: Some("tok".into()),
                ..Default::default()
            },
            SyncArgs {
                primary_account: Some("111".into()),
                additional_account: Some("222".into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn parses_config_file() {
        let file = parse(
            r#"
            [accounts]
            primary = "111"
            additional = "222"

            [sync]
            label = "Amex synced"
            dry_run = false

            [api]
            url = "http://localhost:8080/graphql"
            "#,
        );

        assert_eq!(file.accounts.primary.as_deref(), Some("111"));
        assert_eq!(file.accounts.additional.as_deref(), Some("222"));
        assert_eq!(file.sync.label.as_deref(), Some("Amex synced"));
        assert_eq!(file.sync.dry_run, Some(false));
        assert_eq!(
            file.api.url.as_deref(),
            Some("http://localhost:8080/graphql")
        );
    }

    #[test]
    fn rejects_unknown_fields() {
        let token_in_file = toml::from_str::<ConfigFile>("[api]\ntoken = \"secret\"\n");
        assert!(token_in_file.is_err());

        let unknown_section = toml::from_str::<ConfigFile>("[journal]\nfiles = []\n");
        assert!(unknown_section.is_err());
    }

    #[test]
    fn dry_run_is_only_disabled_by_false() {
        assert_eq!(parse_dry_run("false"), Ok(false));
        assert_eq!(parse_dry_run("FALSE"), Ok(false));
        assert_eq!(parse_dry_run(" False "), Ok(false));
        assert_eq!(parse_dry_run("true"), Ok(true));
        assert_eq!(parse_dry_run("0"), Ok(true));
        assert_eq!(parse_dry_run("no"), Ok(true));
        assert_eq!(parse_dry_run(""), Ok(true));
    }

    #[test]
    fn defaults_apply_without_file() {
        let (connection_args, args) = full_args();
        let (connection, options) =
            resolve_sync(connection_args, args, &ConfigFile::default()).unwrap();

        assert_eq!(
            connection,
            Connection {
                token: "tok".into(),
                api_url: card_sync_monarch::DEFAULT_API_URL.into(),
            }
        );
        assert_eq!(options.primary_account, "111");
        assert_eq!(options.additional_account, "222");
        assert_eq!(options.label, DEFAULT_LABEL);
        assert_eq!(options.mode, Mode::DryRun);
    }

    #[test]
    fn arguments_override_file() {
        let file = parse(
            r#"
            [accounts]
            primary = "from-file"
            additional = "also-from-file"

            [sync]
            label = "file-label"
            dry_run = true
            "#,
        );
        let (connection_args, mut args) = full_args();
        args.label = Some("Amex".into());
        args.dry_run = Some(false);

        let (_, options) = resolve_sync(connection_args, args, &file).unwrap();

        assert_eq!(options.primary_account, "111");
        assert_eq!(options.additional_account, "222");
        assert_eq!(options.label, "Amex");
        assert_eq!(options.mode, Mode::Live);
    }

    #[test]
    fn file_fills_in_missing_arguments() {
        let file = parse(
            r#"
            [accounts]
            primary = "from-file"
            additional = "also-from-file"

            [sync]
            dry_run = false
            "#,
        );
        let connection_args = ConnectionArgs {
            token: Some("tok".into()),
            ..Default::default()
        };

        let (_, options) = resolve_sync(connection_args, SyncArgs::default(), &file).unwrap();

        assert_eq!(options.primary_account, "from-file");
        assert_eq!(options.additional_account, "also-from-file");
        assert_eq!(options.mode, Mode::Live);
    }

    #[test]
    fn bearer_token_is_a_fallback() {
        let (mut connection_args, args) = full_args();
        connection_args.token = None;
        connection_args.bearer_token = Some("bearer".into());

        let (connection, _) = resolve_sync(connection_args, args, &ConfigFile::default()).unwrap();

        assert_eq!(connection.token, "bearer");
    }

    #[test]
    fn reports_every_missing_setting() {
        let connection_args = ConnectionArgs {
            token: Some("  ".into()),
            ..Default::default()
        };
        let args = SyncArgs {
            primary_account: Some(String::new()),
            ..Default::default()
        };

        let error = resolve_sync(connection_args, args, &ConfigFile::default()).unwrap_err();

        insta::assert_snapshot!(error.to_string(), @"Missing required configuration: MAIN_ACCOUNT_ID, ADDL_ACCOUNT_ID, MONARCH_API_TOKEN (or MONARCH_BEARER_TOKEN)");
    }

    #[test]
    fn labels_only_need_a_token() {
        let file = ConfigFile::default();
        let error = resolve_connection(Default::default(), &file).unwrap_err();
        assert!(matches!(
            error,
            card_sync::Error::Configuration { ref missing } if missing.len() == 1
        ));

        let file = parse("[api]\nurl = \"http://localhost/graphql\"\n");
        let connection = resolve_connection(
            ConnectionArgs {
                token: Some("tok".into()),
                ..Default::default()
            },
            &file,
        )
        .unwrap();
        assert_eq!(connection.api_url, "http://localhost/graphql");
    }
}
