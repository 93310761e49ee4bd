//! Status payload markup sent by the host with every update event
//!
//! The document carries an optional build token and a `form_data` element
//! whose `action` attribute tells the panel why it was opened:
//!
//! ```xml
//! <root>
//!   <git_hash>3f2a9c1</git_hash>
//!   <form_data action="item_edit"/>
//! </root>
//! ```

use roxmltree::Document;

use crate::error::PayloadError;

pub const ROOT_TAG: &str = "root";
pub const TOKEN_TAG: &str = "git_hash";
pub const FORM_DATA_TAG: &str = "form_data";
pub const ACTION_ATTRIBUTE: &str = "action";

/// Reason the host opened the debug panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Compilation failed while redoing items that were not edited
    RedoItems,
    /// Compilation failed while creating a new item
    ItemCreate,
    /// Compilation failed while editing an existing item
    ItemEdit,
    /// A value this panel does not know about
    Unknown(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::RedoItems => "redo_items",
            Action::ItemCreate => "item_create",
            Action::ItemEdit => "item_edit",
            Action::Unknown(value) => value.as_str(),
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        match value {
            "redo_items" => Action::RedoItems,
            "item_create" => Action::ItemCreate,
            "item_edit" => Action::ItemEdit,
            other => Action::Unknown(other.to_string()),
        }
    }
}

/// Contents of a well-formed status payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusPayload {
    pub action: Option<Action>,
    pub token: Option<String>,
}

impl StatusPayload {
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action),
            token: None,
        }
    }

    #[cfg(test)]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Encode as the markup document the panel expects
    pub fn to_markup(&self) -> String {
        let mut markup = format!("<{}>", ROOT_TAG);
        if let Some(token) = &self.token {
            markup.push_str(&format!(
                "<{tag}>{}</{tag}>",
                escape_markup(token),
                tag = TOKEN_TAG
            ));
        }
        match &self.action {
            Some(action) => markup.push_str(&format!(
                "<{} {}=\"{}\"/>",
                FORM_DATA_TAG,
                ACTION_ATTRIBUTE,
                escape_markup(action.as_str())
            )),
            None => markup.push_str(&format!("<{}/>", FORM_DATA_TAG)),
        }
        markup.push_str(&format!("</{}>", ROOT_TAG));
        markup
    }
}

/// Outcome of reading a status payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStatus {
    /// A `form_data` element was found
    Valid(StatusPayload),
    /// Well-formed, but without `form_data`
    Missing { token: Option<String> },
    /// Not parseable as markup
    Malformed(PayloadError),
}

impl ParsedStatus {
    /// Verification token, if the document carried one
    pub fn token(&self) -> Option<&str> {
        match self {
            ParsedStatus::Valid(payload) => payload.token.as_deref(),
            ParsedStatus::Missing { token } => token.as_deref(),
            ParsedStatus::Malformed(_) => None,
        }
    }
}

/// Parse a status payload. Never fails; problems are reported as variants.
pub fn parse_status(markup: &str) -> ParsedStatus {
    let document = match Document::parse(markup) {
        Ok(document) => document,
        Err(e) => return ParsedStatus::Malformed(PayloadError::Markup(e.to_string())),
    };

    let token = document
        .descendants()
        .find(|node| node.has_tag_name(TOKEN_TAG))
        .and_then(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    match document
        .descendants()
        .find(|node| node.has_tag_name(FORM_DATA_TAG))
    {
        Some(form_data) => ParsedStatus::Valid(StatusPayload {
            action: form_data.attribute(ACTION_ATTRIBUTE).map(Action::from),
            token,
        }),
        None => ParsedStatus::Missing { token },
    }
}

fn escape_markup(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
