use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::SessionMarker;
use crate::interface_adapters::protocol::EndpointGroup;

// The session cookie in the transport's jar. The server owns the session;
// clearing it here only drops the local copy.
//
// The jar keys cookies by domain, path and name, and the backend may scope
// the session cookie to any directory above an endpoint (explicitly, or by
// the default path of the response that set it). Both operations therefore
// look at every endpoint group under the base URL.
pub struct CookieSessionMarker {
    jar: Arc<Jar>,
    url: Url,
    name: String,
}

impl CookieSessionMarker {
    pub fn new(jar: Arc<Jar>, url: Url, name: impl Into<String>) -> Self {
        Self {
            jar,
            url,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // The base URL plus one URL inside each endpoint group's directory.
    fn scopes(&self) -> Vec<Url> {
        let base = self.url.as_str().trim_end_matches('/');
        let groups = EndpointGroup::ALL
            .iter()
            .filter_map(|group| Url::parse(&format!("{base}{}/", group.prefix())).ok());
        std::iter::once(self.url.clone()).chain(groups).collect()
    }

    // Every path a cookie sent to one of the scopes can be stored under.
    fn cookie_paths(&self) -> BTreeSet<String> {
        let mut paths = BTreeSet::from(["/".to_string()]);
        for scope in self.scopes() {
            let mut path = String::new();
            for segment in scope.path().split('/').filter(|s| !s.is_empty()) {
                path.push('/');
                path.push_str(segment);
                paths.insert(path.clone());
                paths.insert(format!("{path}/"));
            }
        }
        paths
    }

    fn sent_to(&self, url: &Url) -> bool {
        let Some(header) = self.jar.cookies(url) else {
            return false;
        };
        let Ok(header) = header.to_str() else {
            return false;
        };
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, _)| name == self.name)
    }
}

impl SessionMarker for CookieSessionMarker {
    fn clear(&self) {
        // An already-expired cookie evicts the stored one with the same
        // domain, path and name.
        for path in self.cookie_paths() {
            let expired = format!("{}=; Max-Age=0; Path={path}", self.name);
            self.jar.add_cookie_str(&expired, &self.url);
        }
        tracing::debug!(cookie = %self.name, "session cookie cleared");
    }

    fn is_present(&self) -> bool {
        self.scopes().iter().any(|scope| self.sent_to(scope))
    }
}
