//! Remote user collection: record types and the HTTP backend.
//!
//! The controller only talks to [`UserBackend`]; [`HttpUserBackend`] is the
//! production implementation against a JSONPlaceholder-style `/users` API.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Context, Result, simple_error};

/// Default remote collection used when no `--api-url` is given.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// A user record as stored by the remote collection.
///
/// Only `id`, `name`, `email` and `phone` are edited by this tool. Any other
/// fields the service sends are preserved in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            extra: Map::new(),
        }
    }

    /// String value of an extra top-level field, e.g. `username` or `website`.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }

    /// Company name from the nested `company` object, if present.
    pub fn company_name(&self) -> Option<&str> {
        self.extra
            .get("company")
            .and_then(|c| c.get("name"))
            .and_then(Value::as_str)
    }

    /// Merge the fields echoed back by an update into this record.
    ///
    /// Fields absent from the patch keep their current value. The local `id`
    /// is never replaced.
    pub fn apply_patch(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        for (k, v) in patch.extra {
            self.extra.insert(k, v);
        }
    }
}

/// Request body for create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Fields returned by an update. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Operations on the remote user collection.
pub trait UserBackend {
    fn list_users(&self) -> Result<Vec<User>>;
    fn create_user(&self, draft: &UserDraft) -> Result<User>;
    fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserPatch>;
    fn delete_user(&self, id: u64) -> Result<()>;
}

/// Blocking HTTP client for a `/users` REST collection.
#[derive(Clone, Debug)]
pub struct HttpUserBackend {
    client: Client,
    base_url: String,
}

impl HttpUserBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .with_ctx(|| "failed to build HTTP client".to_string())?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(%base_url, ?timeout, "created user API client");
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    pub fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

/// Turn a non-2xx response into an error carrying the status and body.
fn ensure_success(method: &str, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        Err(simple_error(format!("{method} {url} returned status {status}")))
    } else {
        Err(simple_error(format!(
            "{method} {url} returned status {status}: {body}"
        )))
    }
}

impl UserBackend for HttpUserBackend {
    fn list_users(&self) -> Result<Vec<User>> {
        let url = self.users_url();
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .with_ctx(|| format!("GET {url}"))?;
        ensure_success("GET", &url, response)?
            .json::<Vec<User>>()
            .with_ctx(|| format!("decode GET {url}"))
    }

    fn create_user(&self, draft: &UserDraft) -> Result<User> {
        let url = self.users_url();
        debug!(%url, name = %draft.name, "POST");
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .with_ctx(|| format!("POST {url}"))?;
        ensure_success("POST", &url, response)?
            .json::<User>()
            .with_ctx(|| format!("decode POST {url}"))
    }

    fn update_user(&self, id: u64, draft: &UserDraft) -> Result<UserPatch> {
        let url = self.user_url(id);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .with_ctx(|| format!("PUT {url}"))?;
        ensure_success("PUT", &url, response)?
            .json::<UserPatch>()
            .with_ctx(|| format!("decode PUT {url}"))
    }

    fn delete_user(&self, id: u64) -> Result<()> {
        let url = self.user_url(id);
        debug!(%url, "DELETE");
        let response = self
            .client
            .delete(&url)
            .send()
            .with_ctx(|| format!("DELETE {url}"))?;
        ensure_success("DELETE", &url, response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port and return the base URL.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            loop {
                line.clear();
                let n = reader.read_line(&mut line).unwrap();
                if n == 0 || line == "\r\n" {
                    break;
                }
            }
            let mut stream = reader.into_inner();
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: text/plain\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        (format!("http://{addr}"), handle)
    }

    /// Client that ignores any proxy configured in the environment.
    fn local_backend(base_url: String) -> HttpUserBackend {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpUserBackend { client, base_url }
    }

    #[test]
    fn user_keeps_unknown_fields() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona" }
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Leanne Graham");
        assert_eq!(user.extra_str("username"), Some("Bret"));
        assert_eq!(user.extra_str("website"), Some("hildegard.org"));
        assert_eq!(user.company_name(), Some("Romaguera-Crona"));
        assert!(!user.extra.contains_key("id"));
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut user = User::new(3, "Clementine", "c@example.org", "123");
        user.extra
            .insert("username".into(), Value::String("Samantha".into()));

        let patch: UserPatch =
            serde_json::from_str(r#"{"id": 99, "name": "X", "website": "x.org"}"#).unwrap();
        user.apply_patch(patch);

        assert_eq!(user.id, 3);
        assert_eq!(user.name, "X");
        assert_eq!(user.email, "c@example.org");
        assert_eq!(user.phone, "123");
        assert_eq!(user.extra_str("username"), Some("Samantha"));
        assert_eq!(user.extra_str("website"), Some("x.org"));
    }

    #[test]
    fn draft_serializes_three_fields() {
        let draft = UserDraft {
            name: "A".into(),
            email: "a@b.c".into(),
            phone: "1".into(),
        };
        let v = serde_json::to_value(&draft).unwrap();
        assert_eq!(v, serde_json::json!({"name": "A", "email": "a@b.c", "phone": "1"}));
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let api = HttpUserBackend::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(api.users_url(), "http://localhost:3000/users");
        assert_eq!(api.user_url(7), "http://localhost:3000/users/7");
    }

    #[test]
    fn error_status_carries_method_status_and_body() {
        let (base, server) = serve_once("500 Internal Server Error", "oops");
        let api = local_backend(base);
        let err = api.list_users().unwrap_err().to_string();
        server.join().unwrap();
        assert!(err.starts_with("GET "), "{err}");
        assert!(err.contains("500"), "{err}");
        assert!(err.ends_with(": oops"), "{err}");
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", "not json");
        let api = local_backend(base);
        let err = api.list_users().unwrap_err().to_string();
        server.join().unwrap();
        assert!(err.contains("decode GET"), "{err}");
        assert!(err.contains("/users"), "{err}");
    }
}
