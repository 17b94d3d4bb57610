//! Page-level data handed to every panel at page load
use std::sync::Arc;

use crate::config::Config;
use crate::models::{Comment, Locale, UserId};
use crate::services::Service;

/// The signed in user browsing the page
#[derive(Clone, Debug, PartialEq)]
pub struct Viewer {
    pub id: UserId,
    pub name: Option<String>,
    pub is_admin: bool,
}

/// Static context for all panels of the app
#[derive(Clone)]
pub struct StaticContext {
    pub config: Arc<Config>,
    pub service: Service,
}

impl StaticContext {
    /// Create a new static context
    pub fn new(config: Arc<Config>, service: Service) -> Self {
        Self { config, service }
    }
}

/// Dynamic context, supplied fresh on every navigation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DynamicContext {
    pub viewer: Option<Viewer>,
    pub locale: Locale,
}

impl DynamicContext {
    /// Create a new dynamic context
    pub fn new(viewer: Option<Viewer>, locale: Locale) -> Self {
        Self { viewer, locale }
    }

    /// Owners may edit or delete their own comments, admins any comment
    pub fn can_modify(&self, comment: &Comment) -> bool {
        match self.viewer {
            Some(ref viewer) => viewer.is_admin || comment.is_owned_by(viewer.id),
            None => false,
        }
    }
}
