use crate::build_url::{scope_segments, BuildUrlOptions};
use crate::error::Error;
use reqwest::blocking::RequestBuilder;
use url::Url;

pub(crate) struct BearerAuth {
    token: String,
}

impl BearerAuth {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

pub(crate) fn apply_auth(req: RequestBuilder, auth: &Option<BearerAuth>) -> RequestBuilder {
    match auth {
        Some(auth) => req.bearer_auth(&auth.token),
        None => req,
    }
}

/// Appends `scope` (split on `/`) and then `segments` to the base URL path.
pub(crate) fn build_url(
    base_url: &Url,
    scope: &str,
    segments: &[&str],
    options: BuildUrlOptions,
) -> Result<Url, Error> {
    let mut url = base_url.clone();
    if options.clear_query {
        url.set_query(None);
    }
    if options.clear_fragment {
        url.set_fragment(None);
    }
    {
        let mut path_segments = url
            .path_segments_mut()
            .map_err(|_| Error::InvalidBaseUrl(base_url.to_string()))?;
        if options.pop_if_empty {
            path_segments.pop_if_empty();
        }
        for segment in scope_segments(scope) {
            path_segments.push(segment);
        }
        for segment in segments {
            path_segments.push(segment);
        }
    }
    Ok(url)
}

/// Only follow continuation links that stay on the origin that issued the
/// bearer token.
pub(crate) fn same_origin(base_url: &Url, next: &Url) -> bool {
    base_url.scheme() == next.scheme()
        && base_url.host_str() == next.host_str()
        && base_url.port_or_known_default() == next.port_or_known_default()
}
