//! CLI route: single route table and run context. Dispatches to the store,
//! snapshot assembler, and remote client.

use crate::cli::parse::{ApiArgs, Commands};
use crate::config::{resolve_api, ApiOptions, RemoteSettings, ResolvedApi, SettingsLoader};
use crate::error::SyncError;
use crate::fingerprint::fingerprint;
use crate::remote::RemoteClient;
use crate::snapshot::{fetch_merged, SnapshotAssembler};
use crate::store::{canonical_json, read_tree, write_tree, I18nStore};
use crate::tree::Tree;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Runtime context for CLI execution: working languages, storage root, and
/// file settings.
pub struct RunContext {
    langs: Vec<String>,
    i18n_dir: Option<PathBuf>,
    settings: RemoteSettings,
}

impl RunContext {
    pub fn new(langs: Vec<String>, i18n_dir: Option<PathBuf>) -> Result<Self, SyncError> {
        let settings = SettingsLoader::load()?;
        Ok(Self {
            langs,
            i18n_dir,
            settings,
        })
    }

    /// Execute a CLI command. `Ok(Some(_))` is printed to stdout by the
    /// binary; `Ok(None)` means all output went to files.
    pub fn execute(&self, command: &Commands) -> Result<Option<String>, SyncError> {
        match command {
            Commands::Split { file, string } => self.handle_split(file, string.as_deref()),
            Commands::Join { file } => self.handle_join(file),
            Commands::Hash => self.handle_hash(),
            Commands::Download {
                api,
                no_write,
                file,
            } => self.handle_download(api, *no_write, file),
            Commands::Upload {
                api,
                file,
                throttle,
            } => self.handle_upload(api, file, *throttle),
        }
    }

    fn store(&self) -> Result<I18nStore, SyncError> {
        let dir = self.i18n_dir.as_ref().ok_or_else(|| {
            SyncError::Config("Set --i18n-dir to use the chunked layout".to_string())
        })?;
        Ok(I18nStore::new(dir))
    }

    fn assembler(&self) -> Result<SnapshotAssembler, SyncError> {
        SnapshotAssembler::new(self.store()?)
    }

    /// Explicit file lists must pair up with the language list.
    fn check_file_count(&self, files: &[PathBuf]) -> Result<(), SyncError> {
        if !files.is_empty() && files.len() != self.langs.len() {
            return Err(SyncError::Config(format!(
                "Got {} --file arguments for {} languages; counts must match",
                files.len(),
                self.langs.len()
            )));
        }
        Ok(())
    }

    fn resolve_api(&self, api: &ApiArgs) -> Result<ResolvedApi, SyncError> {
        let options = ApiOptions {
            api_token: api.api_token.clone(),
            api_id: api.api_id.clone(),
            api_url: api.api_url.clone(),
            tag: api.tag.clone(),
            main_tag: api.main_tag.clone(),
        };
        resolve_api(&options, &self.settings)
    }

    fn handle_split(&self, files: &[PathBuf], string: Option<&str>) -> Result<Option<String>, SyncError> {
        let trees = if let Some(string) = string {
            parse_inline_input(string)?
        } else {
            files.iter().map(|f| read_tree(f)).collect::<Result<_, _>>()?
        };
        if trees.len() != self.langs.len() {
            return Err(SyncError::Config(format!(
                "Got {} input trees for {} languages; counts must match",
                trees.len(),
                self.langs.len()
            )));
        }

        let assembler = self.assembler()?;
        for (language, tree) in self.langs.iter().zip(trees) {
            assembler.write_sliced(language, tree)?;
            info!(%language, "split into chunks");
        }
        Ok(None)
    }

    fn handle_join(&self, files: &[PathBuf]) -> Result<Option<String>, SyncError> {
        self.check_file_count(files)?;
        let assembler = self.assembler()?;

        let mut joined = Vec::with_capacity(self.langs.len());
        for (index, language) in self.langs.iter().enumerate() {
            let tree = assembler.read_joined(language)?;
            if let Some(file) = files.get(index) {
                write_tree(file, &tree)?;
                info!(%language, file = %file.display(), "joined to file");
            }
            joined.push(Value::Object(tree));
        }

        if files.is_empty() {
            Ok(Some(dump_output(joined)))
        } else {
            Ok(None)
        }
    }

    fn handle_hash(&self) -> Result<Option<String>, SyncError> {
        let digest = fingerprint(&self.store()?, &self.langs)?;
        Ok(Some(digest))
    }

    fn handle_download(
        &self,
        api: &ApiArgs,
        no_write: bool,
        files: &[PathBuf],
    ) -> Result<Option<String>, SyncError> {
        self.check_file_count(files)?;
        let resolved = self.resolve_api(api)?;
        // Resolve the write target before any network call so configuration
        // problems abort up front.
        let assembler = if no_write || !files.is_empty() {
            None
        } else {
            Some(self.assembler()?)
        };
        let client = RemoteClient::new(
            resolved.api_url.clone(),
            resolved.api_token.clone(),
            resolved.api_id.clone(),
        );

        let mut downloaded = Vec::with_capacity(self.langs.len());
        for (index, language) in self.langs.iter().enumerate() {
            let tree = fetch_merged(&client, language, &resolved.tag, &resolved.main_tag)?;
            info!(%language, tag = %resolved.tag, "downloaded merged snapshot");
            if no_write {
                downloaded.push(Value::Object(tree));
            } else if let Some(file) = files.get(index) {
                write_tree(file, &tree)?;
            } else if let Some(assembler) = &assembler {
                assembler.write_sliced(language, tree)?;
            }
        }

        if no_write {
            Ok(Some(dump_output(downloaded)))
        } else {
            Ok(None)
        }
    }

    fn handle_upload(
        &self,
        api: &ApiArgs,
        files: &[PathBuf],
        throttle: Option<u64>,
    ) -> Result<Option<String>, SyncError> {
        self.check_file_count(files)?;
        let resolved = self.resolve_api(api)?;
        let assembler = if files.is_empty() {
            Some(self.assembler()?)
        } else {
            None
        };
        let client = RemoteClient::new(
            resolved.api_url.clone(),
            resolved.api_token.clone(),
            resolved.api_id.clone(),
        );
        let throttle_secs = throttle.unwrap_or(self.settings.throttle_secs);

        let mut responses = Vec::with_capacity(self.langs.len());
        for (index, language) in self.langs.iter().enumerate() {
            if index > 0 {
                // The service rate-limits uploads; a fixed pause between
                // languages keeps us under it. Never before the first one.
                debug!(throttle_secs, "throttling before next upload");
                std::thread::sleep(Duration::from_secs(throttle_secs));
            }
            let tree: Tree = match files.get(index) {
                Some(file) => read_tree(file)?,
                None => match &assembler {
                    Some(assembler) => assembler.read_joined(language)?,
                    None => Tree::new(),
                },
            };
            let response = client.upload(language, &tree, &resolved.tag, &resolved.main_tag)?;
            info!(%language, tag = %resolved.tag, "uploaded translations");
            responses.push(response);
        }

        Ok(Some(dump_output(responses)))
    }
}

/// One value prints bare; several print as an array. Mirrors the language
/// argument shape.
fn dump_output(mut values: Vec<Value>) -> String {
    if values.len() == 1 {
        canonical_json(&values.remove(0))
    } else {
        canonical_json(&Value::Array(values))
    }
}

/// Inline `--string` input: a single object, or an array of objects when
/// several languages are given.
fn parse_inline_input(input: &str) -> Result<Vec<Tree>, SyncError> {
    let parsed: Value = serde_json::from_str(input)?;
    let items = match parsed {
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(map),
            _ => Err(SyncError::Config(
                "Inline input must be a JSON object per language".to_string(),
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dump_output_single_vs_multiple() {
        assert_eq!(dump_output(vec![json!({"a": 1})]), "{\n  \"a\": 1\n}");
        assert_eq!(
            dump_output(vec![json!({"a": 1}), json!({"b": 2})]),
            "[\n  {\n    \"a\": 1\n  },\n  {\n    \"b\": 2\n  }\n]"
        );
    }

    #[test]
    fn test_parse_inline_single_object() {
        let trees = parse_inline_input(r#"{"hello": "hi"}"#).unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].get("hello"), Some(&json!("hi")));
    }

    #[test]
    fn test_parse_inline_array_of_objects() {
        let trees = parse_inline_input(r#"[{"a": 1}, {"b": 2}]"#).unwrap();
        assert_eq!(trees.len(), 2);
    }

    #[test]
    fn test_parse_inline_rejects_scalars() {
        assert!(parse_inline_input(r#"["x", {"a": 1}]"#).is_err());
    }

    #[test]
    fn test_missing_i18n_dir_is_config_error() {
        let context = RunContext {
            langs: vec!["en".to_string()],
            i18n_dir: None,
            settings: RemoteSettings::default(),
        };
        assert!(matches!(context.store(), Err(SyncError::Config(_))));
    }

    #[test]
    fn test_file_count_mismatch_is_config_error() {
        let context = RunContext {
            langs: vec!["en".to_string(), "fr".to_string()],
            i18n_dir: None,
            settings: RemoteSettings::default(),
        };
        let files = vec![PathBuf::from("en.json")];
        assert!(matches!(
            context.check_file_count(&files),
            Err(SyncError::Config(_))
        ));
        assert!(context.check_file_count(&[]).is_ok());
    }
}
