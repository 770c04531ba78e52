use crate::http::{header, HeaderValue, Response};

/// A response header declared on a router, controller, or handler.
///
/// Declared headers are added to every response of the handlers they apply
/// to, unless the handler already set the header itself.
/// `documentation_only` headers describe a header the handler sets on its own
/// and are never written by Girder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub value: HeaderValue,
    pub description: Option<String>,
    pub documentation_only: bool,
}

impl ResponseHeader {
    pub fn new(value: HeaderValue) -> Self {
        Self {
            value,
            description: None,
            documentation_only: false,
        }
    }

    pub fn from_static(value: &'static str) -> Self {
        Self::new(HeaderValue::from_static(value))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn documentation_only(mut self) -> Self {
        self.documentation_only = true;
        self
    }
}

/// Shapes the responses produced by the handlers it applies to.
///
/// Only the nearest layer's response class applies: a handler-level class
/// replaces the controller's, which replaces the router's.
pub trait ResponseClass: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn finalize(&self, response: Response) -> Response;
}

/// Response class that stamps a fixed `Content-Type` on every response.
#[derive(Debug, Clone)]
pub struct MediaTypeResponse {
    media_type: HeaderValue,
}

impl MediaTypeResponse {
    pub fn new(media_type: HeaderValue) -> Self {
        Self { media_type }
    }

    pub fn from_static(media_type: &'static str) -> Self {
        Self::new(HeaderValue::from_static(media_type))
    }
}

impl ResponseClass for MediaTypeResponse {
    fn name(&self) -> &str {
        "MediaTypeResponse"
    }

    fn finalize(&self, mut response: Response) -> Response {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, self.media_type.clone());
        response
    }
}
