use crate::settings::Settings;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use url::Url;
use warren::operation::{ApiRequest, ApiResponse, Transport, TransportFailure};
use warren::query::encode_pairs;
use warren::JSON_API_HEADER;

/// Blocking HTTP transport with bearer authentication.
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ReqwestTransport {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut base_url = settings.base_url()?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("warren/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let token = settings.token.clone().filter(|t| !t.trim().is_empty());
        Ok(Self { client, base_url, token })
    }

    /// Absolute URLs (followed links) are used as given. A root-relative path
    /// that already starts with the base URL's prefix is resolved against the
    /// origin; anything else is relative to the base URL, keeping its prefix.
    pub fn url(&self, request: &ApiRequest) -> Result<Url, TransportFailure> {
        let mut url = match Url::parse(&request.path) {
            Ok(url) => url,
            Err(_) => {
                let path = request.path.as_str();
                let joined = if path.starts_with('/') && path.starts_with(self.base_url.path()) {
                    self.base_url.join(path)
                } else {
                    self.base_url.join(path.trim_start_matches('/'))
                };
                joined.map_err(|err| TransportFailure {
                    status: None,
                    message: format!("invalid request path `{}`: {}", request.path, err),
                    body: Vec::new(),
                })?
            },
        };
        if !request.query.is_empty() {
            url.set_query(Some(&encode_pairs(&request.query)));
        }
        Ok(url)
    }
}

fn failure(err: reqwest::Error) -> TransportFailure {
    TransportFailure { status: err.status(), message: err.to_string(), body: Vec::new() }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, TransportFailure> {
        let url = self.url(request)?;
        let mut builder =
            self.client.request(request.method.clone(), url.clone()).header(ACCEPT, JSON_API_HEADER);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, JSON_API_HEADER).body(body.clone());
        }

        let response = builder.send().map_err(failure)?;
        let status = response.status();
        let body = response.bytes().map_err(failure)?.to_vec();
        if !status.is_success() {
            let message = format!("{} {}: {}", request.method, url, status);
            return Err(TransportFailure { status: Some(status), message, body });
        }
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use warren::query::Query;

    fn transport(base_url: &str) -> ReqwestTransport {
        let settings =
            Settings { base_url: base_url.into(), token: Some(" ".into()), page_limit: 0, timeout_secs: 5 };
        ReqwestTransport::new(&settings).unwrap()
    }

    #[test]
    fn paths_keep_the_base_prefix() {
        let transport = transport("https://api.example.com/v1");
        assert!(transport.token.is_none());

        let mut query = Query::new();
        query.filter("city", "NY").include(&["customer"]);
        let request = ApiRequest::new(Method::GET, "/projects/12").with_query(&query);
        assert_eq!(
            transport.url(&request).unwrap().as_str(),
            "https://api.example.com/v1/projects/12?filter[city]=NY&include=customer"
        );
    }

    #[test]
    fn root_relative_links_keep_a_single_prefix() {
        let prefixed = transport("https://api.example.com/v1");
        let href = "/v1/projects?page[offset]=2";
        let request =
            ApiRequest::new(Method::GET, "/v1/projects").with_query(&Query::from_link(href).unwrap());
        assert_eq!(
            prefixed.url(&request).unwrap().as_str(),
            "https://api.example.com/v1/projects?page[offset]=2"
        );

        let request = ApiRequest::new(Method::GET, "/projects");
        assert_eq!(prefixed.url(&request).unwrap().as_str(), "https://api.example.com/v1/projects");

        let bare = transport("https://api.example.com");
        assert_eq!(bare.url(&request).unwrap().as_str(), "https://api.example.com/projects");
    }

    #[test]
    fn followed_links_are_absolute() {
        let transport = transport("https://api.example.com/v1/");
        let request = ApiRequest::new(Method::GET, "https://cdn.example.com/projects")
            .with_query(&Query::from_link("?page[offset]=2").unwrap());
        assert_eq!(
            transport.url(&request).unwrap().as_str(),
            "https://cdn.example.com/projects?page[offset]=2"
        );
    }
}
