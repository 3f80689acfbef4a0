//! Localized notification message templates.
//!
//! Message bodies are rendered from an embedded minijinja catalog keyed by
//! `(locale, message key)`. The dispatcher never formats strings by hand,
//! so wording lives in one place per language.

use crate::notification::domain::Locale;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Template selector, one per distinct message wording.
///
/// Finer-grained than [`NotificationKind`](crate::notification::domain::NotificationKind):
/// status changes and effort logs are both `Update` notifications but read
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// A task moved between statuses.
    StatusChanged,
    /// Effort was logged against a task.
    EffortLogged,
    /// The receiver was assigned to a task.
    TaskAssigned,
    /// A deadline alert for the receiver.
    Deadline,
    /// The receiver was mentioned.
    Mention,
}

impl MessageKey {
    /// Returns the template stem.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusChanged => "status_changed",
            Self::EffortLogged => "effort_logged",
            Self::TaskAssigned => "task_assigned",
            Self::Deadline => "deadline",
            Self::Mention => "mention",
        }
    }
}

/// Error raised when a message template fails to render.
#[derive(Debug, Error)]
#[error("failed to render message template '{template}': {source}")]
pub struct RenderError {
    /// Template name that failed.
    pub template: String,
    /// Underlying template engine error.
    #[source]
    pub source: minijinja::Error,
}

const TEMPLATES: [(&str, &str); 10] = [
    (
        "en/status_changed",
        "Task '{{ task }}' moved from {{ from }} to {{ to }}.",
    ),
    (
        "tr/status_changed",
        "'{{ task }}' görevi {{ from }} durumundan {{ to }} durumuna taşındı.",
    ),
    (
        "en/effort_logged",
        "{{ labor }} logged on task '{{ task }}' (total {{ total }}).",
    ),
    (
        "tr/effort_logged",
        "'{{ task }}' görevine {{ labor }} efor işlendi (toplam {{ total }}).",
    ),
    (
        "en/task_assigned",
        "You were assigned to task '{{ task }}' as {{ role }}.",
    ),
    (
        "tr/task_assigned",
        "'{{ task }}' görevine {{ role }} olarak atandınız.",
    ),
    ("en/deadline", "Task '{{ task }}' is due {{ when }}."),
    ("tr/deadline", "'{{ task }}' görevinin teslim tarihi: {{ when }}."),
    ("en/mention", "You were mentioned on task '{{ task }}'."),
    ("tr/mention", "'{{ task }}' görevinde sizden bahsedildi."),
];

/// Embedded per-locale notification message catalog.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    env: Environment<'static>,
}

impl MessageCatalog {
    /// Builds the catalog from the embedded templates.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            // Embedded templates are static and parsed lazily at render
            // time, so registration cannot fail here.
            env.add_template(name, source).ok();
        }
        Self { env }
    }

    /// Renders the message for `key` in `locale` with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the template is missing or the context
    /// does not satisfy it.
    pub fn render<S: Serialize>(
        &self,
        locale: Locale,
        key: MessageKey,
        context: &S,
    ) -> Result<String, RenderError> {
        let name = format!("{}/{}", locale.as_str(), key.as_str());
        let template = self.env.get_template(&name).map_err(|source| RenderError {
            template: name.clone(),
            source,
        })?;
        template.render(context).map_err(|source| RenderError {
            template: name.clone(),
            source,
        })
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
