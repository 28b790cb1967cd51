//! POEditor-shaped translation service client.
//!
//! All requests are blocking and strictly sequential; the service rate-limits
//! uploads, so callers insert a fixed delay between languages instead of any
//! adaptive scheme. A non-2xx status is fatal with no retry. A malformed
//! export body is recovered as an empty tree.

use crate::error::SyncError;
use crate::store::canonical_json;
use crate::tree::Tree;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.poeditor.com/v2";
pub const DEFAULT_MAIN_TAG: &str = "master";
pub const DEFAULT_UPLOAD_THROTTLE_SECS: u64 = 30;

/// Client bound to one project on one service endpoint.
pub struct RemoteClient {
    http: Client,
    api_url: String,
    api_token: String,
    project_id: String,
}

#[derive(Deserialize)]
struct ExportResponse {
    result: Option<ExportResult>,
}

#[derive(Deserialize)]
struct ExportResult {
    url: Option<String>,
}

impl RemoteClient {
    pub fn new(api_url: String, api_token: String, project_id: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            api_token,
            project_id,
        }
    }

    /// Export one language's tree, optionally filtered to one tag. The
    /// service answers with a short-lived URL; the content fetched from it is
    /// the tree itself, or an empty tree when the body is not a JSON object.
    pub fn export(&self, language: &str, tags: Option<&str>) -> Result<Tree, SyncError> {
        let mut fields = vec![
            ("type", "key_value_json"),
            ("api_token", self.api_token.as_str()),
            ("id", self.project_id.as_str()),
            ("language", language),
        ];
        if let Some(tags) = tags {
            fields.push(("tags", tags));
        }
        debug!(language, tags = tags.unwrap_or("<none>"), "requesting export");
        let response = self
            .http
            .post(format!("{}/projects/export", self.api_url))
            .form(&fields)
            .send()?
            .error_for_status()?;
        let export: ExportResponse = response.json()?;
        let url = export
            .result
            .and_then(|r| r.url)
            .ok_or_else(|| SyncError::Remote("export response missing result.url".to_string()))?;

        let content = self.http.get(&url).send()?.error_for_status()?;
        match content.json::<Value>() {
            Ok(Value::Object(map)) => Ok(map),
            // Empty or otherwise malformed export content reads as nothing.
            _ => Ok(Tree::new()),
        }
    }

    /// Upload one language's tree, tagging tiers according to whether the
    /// active tag is the main tag.
    pub fn upload(
        &self,
        language: &str,
        tree: &Tree,
        tag: &str,
        main_tag: &str,
    ) -> Result<Value, SyncError> {
        let is_main = tag == main_tag;
        let tags = upload_tag_map(tag, main_tag);
        let payload = canonical_json(&Value::Object(tree.clone()));

        let form = Form::new()
            .text("api_token", self.api_token.clone())
            .text("id", self.project_id.clone())
            .text("language", language.to_string())
            .text("updating", "terms_translations")
            .text("overwrite", "1")
            .text("fuzzy_trigger", if is_main { "1" } else { "0" })
            .text("tags", canonical_json(&tags))
            .part(
                "file",
                Part::text(payload).file_name(format!("{language}.json")),
            );

        info!(language, tag, "uploading translations");
        let response = self
            .http
            .post(format!("{}/projects/upload", self.api_url))
            .multipart(form)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}

/// Tier-to-tag map sent with an upload.
///
/// On the main tag, all terms get the main tag and the add/remove/change
/// tiers get generic markers. On a feature tag, only new and overwritten
/// terms are tagged, new ones with both the generic marker and the feature
/// tag itself, so everything else keeps inheriting from the main tag.
pub fn upload_tag_map(tag: &str, main_tag: &str) -> Value {
    if tag == main_tag {
        json!({
            "all": main_tag,
            "new": "new-strings",
            "obsolete": "deleted-strings",
            "overwritten_translations": "changed-strings"
        })
    } else {
        json!({
            "new": ["new-strings", tag],
            "overwritten_translations": tag
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_tag_map_main_tag() {
        let tags = upload_tag_map("master", "master");
        assert_eq!(
            tags,
            json!({
                "all": "master",
                "new": "new-strings",
                "obsolete": "deleted-strings",
                "overwritten_translations": "changed-strings"
            })
        );
    }

    #[test]
    fn test_upload_tag_map_feature_tag() {
        let tags = upload_tag_map("feature/login", "master");
        assert_eq!(
            tags,
            json!({
                "new": ["new-strings", "feature/login"],
                "overwritten_translations": "feature/login"
            })
        );
    }
}
