use crate::build_url::BuildUrlOptions;
use crate::client_defaults::{
    DEFAULT_GRAPH_URL, DEFAULT_MANAGEMENT_URL, DEFAULT_TIMEOUT, MAX_LIST_PAGES,
};
use crate::error::{
    parse_error_from_body, read_body_with_limit, Error, CONFIG_ERROR_REDIRECT_WITH_AUTH,
    MAX_ERROR_BODY_BYTES,
};
use crate::models::ListResponse;
use log::{debug, warn};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Certificate, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::common;

mod authorization;
mod identity;
mod policy_insights;
mod providers;


pub struct AzureClientBuilder {
    management_url: Url,
    graph_url: Url,
    timeout: Option<Duration>,
    disable_redirect: bool,
    ca_certs: Vec<Certificate>,
    management_auth: Option<common::BearerAuth>,
    graph_auth: Option<common::BearerAuth>,
}

impl AzureClientBuilder {
    /// Starts a builder pointed at the public Azure cloud endpoints.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            management_url: Url::parse(DEFAULT_MANAGEMENT_URL)?,
            graph_url: Url::parse(DEFAULT_GRAPH_URL)?,
            timeout: Some(DEFAULT_TIMEOUT),
            disable_redirect: true,
            ca_certs: Vec::new(),
            management_auth: None,
            graph_auth: None,
        })
    }

    /// Azure Resource Manager endpoint, e.g. a sovereign cloud.
    pub fn management_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.management_url = Url::parse(url.as_ref())?;
        Ok(self)
    }

    /// Microsoft Graph endpoint including the version segment.
    pub fn graph_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.graph_url = Url::parse(url.as_ref())?;
        Ok(self)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn disable_redirect(mut self, disable: bool) -> Self {
        self.disable_redirect = disable;
        self
    }

    pub fn add_ca_cert_pem(mut self, ca_pem: &[u8]) -> Result<Self, Error> {
        self.ca_certs.push(Certificate::from_pem(ca_pem)?);
        Ok(self)
    }

    /// Bearer token sent to Azure Resource Manager.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.management_auth = Some(common::BearerAuth::new(token));
        self
    }

    /// Bearer token sent to Microsoft Graph.
    pub fn graph_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.graph_auth = Some(common::BearerAuth::new(token));
        self
    }

    pub fn build(self) -> Result<AzureClient, Error> {
        let has_auth = self.management_auth.is_some() || self.graph_auth.is_some();
        if has_auth && !self.disable_redirect {
            return Err(Error::Config(CONFIG_ERROR_REDIRECT_WITH_AUTH.to_string()));
        }
        let mut builder = HttpClient::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if self.disable_redirect {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }
        for cert in self.ca_certs {
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build()?;
        Ok(AzureClient {
            management_url: self.management_url,
            graph_url: self.graph_url,
            http,
            management_auth: self.management_auth,
            graph_auth: self.graph_auth,
        })
    }
}

pub struct AzureClient {
    management_url: Url,
    graph_url: Url,
    http: HttpClient,
    management_auth: Option<common::BearerAuth>,
    graph_auth: Option<common::BearerAuth>,
}

impl AzureClient {
    pub fn builder() -> Result<AzureClientBuilder, Error> {
        AzureClientBuilder::new()
    }

    fn management_url(&self, scope: &str, segments: &[&str]) -> Result<Url, Error> {
        common::build_url(
            &self.management_url,
            scope,
            segments,
            BuildUrlOptions::REQUEST,
        )
    }

    fn graph_url(&self, segments: &[&str]) -> Result<Url, Error> {
        common::build_url(&self.graph_url, "", segments, BuildUrlOptions::REQUEST)
    }

    fn management_get(&self, url: Url) -> RequestBuilder {
        common::apply_auth(self.http.get(url), &self.management_auth)
    }

    fn management_post(&self, url: Url) -> RequestBuilder {
        let req = self.http.post(url).header(CONTENT_LENGTH, "0");
        common::apply_auth(req, &self.management_auth)
    }

    fn graph_get(&self, url: Url) -> RequestBuilder {
        common::apply_auth(self.http.get(url), &self.graph_auth)
    }

    fn expect_ok_json<T: DeserializeOwned>(&self, resp: Response) -> Result<T, Error> {
        if resp.status() == StatusCode::OK {
            resp.json::<T>().map_err(Error::from)
        } else {
            self.parse_error(resp)
        }
    }

    fn parse_error<T>(&self, mut resp: Response) -> Result<T, Error> {
        let status = resp.status();
        let body = read_body_with_limit(&mut resp, MAX_ERROR_BODY_BYTES)?;
        Err(parse_error_from_body(status, &body))
    }

    /// Fetches every page of an ARM collection, following `nextLink`.
    fn list_all<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let resp = self.management_get(url).query(query).send()?;
        let mut page: ListResponse<T> = self.expect_ok_json(resp)?;
        let mut pages = 1;
        loop {
            items.append(&mut page.value);
            let Some(next_link) = page.next_link.take() else {
                break;
            };
            let next = Url::parse(&next_link)?;
            if !common::same_origin(&self.management_url, &next) {
                warn!("ignoring nextLink to foreign origin: {next}");
                break;
            }
            if pages >= MAX_LIST_PAGES {
                warn!("stopping after {pages} pages; collection truncated");
                break;
            }
            debug!("following nextLink page {}", pages + 1);
            let resp = self.management_get(next).send()?;
            page = self.expect_ok_json(resp)?;
            pages += 1;
        }
        Ok(items)
    }
}
