// src/history/event.rs — Normalized action events and their indexing keys

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user did. The set is closed; anything unrecognized is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    Add,
    Delete,
    Modify,
    Select,
    ViewChange,
    Save,
    Copy,
    Move,
    Rotate,
    Mirror,
    Array,
    Group,
    #[serde(other)]
    Other,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Delete => "Delete",
            Self::Modify => "Modify",
            Self::Select => "Select",
            Self::ViewChange => "ViewChange",
            Self::Save => "Save",
            Self::Copy => "Copy",
            Self::Move => "Move",
            Self::Rotate => "Rotate",
            Self::Mirror => "Mirror",
            Self::Array => "Array",
            Self::Group => "Group",
            Self::Other => "Other",
        }
    }

    /// Parse a kind name; unknown names collapse to `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "Add" => Self::Add,
            "Delete" => Self::Delete,
            "Modify" => Self::Modify,
            "Select" => Self::Select,
            "ViewChange" => Self::ViewChange,
            "Save" => Self::Save,
            "Copy" => Self::Copy,
            "Move" => Self::Move,
            "Rotate" => Self::Rotate,
            "Mirror" => Self::Mirror,
            "Array" => Self::Array,
            "Group" => Self::Group,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The view the user was working in when the action happened.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewContext {
    pub view_id: i64,
    #[serde(default)]
    pub view_name: String,
    #[serde(default)]
    pub view_type: String,
    #[serde(default)]
    pub is_sheet: bool,
    #[serde(default)]
    pub sheet_number: Option<String>,
}

impl ViewContext {
    pub fn new(view_id: i64, view_name: &str, view_type: &str) -> Self {
        Self {
            view_id,
            view_name: view_name.to_string(),
            view_type: view_type.to_string(),
            is_sheet: false,
            sheet_number: None,
        }
    }

    pub fn sheet(view_id: i64, view_name: &str, sheet_number: &str) -> Self {
        Self {
            view_id,
            view_name: view_name.to_string(),
            view_type: "Sheet".into(),
            is_sheet: true,
            sheet_number: Some(sheet_number.to_string()),
        }
    }
}

/// Typed per-action payload. Known shapes get their own variant;
/// anything else rides in `Generic`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ActionDetails {
    #[default]
    None,
    Elements {
        #[serde(default)]
        added: Vec<i64>,
        #[serde(default)]
        removed: Vec<i64>,
        #[serde(default)]
        modified: Vec<i64>,
    },
    Selection {
        #[serde(default)]
        element_ids: Vec<i64>,
    },
    Generic {
        #[serde(default)]
        values: BTreeMap<String, serde_json::Value>,
    },
}

/// One normalized user action. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub element_count: u32,
    #[serde(default)]
    pub view: Option<ViewContext>,
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub details: ActionDetails,
}

impl ActionEvent {
    pub fn new(kind: ActionKind, category: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            category: category.trim().to_string(),
            element_count: 0,
            view: None,
            transaction: None,
            details: ActionDetails::None,
        }
    }

    pub fn selection(element_ids: Vec<i64>, category: &str) -> Self {
        let mut e = Self::new(ActionKind::Select, category);
        e.element_count = element_ids.len() as u32;
        e.details = ActionDetails::Selection { element_ids };
        e
    }

    pub fn view_change(view: ViewContext) -> Self {
        let mut e = Self::new(ActionKind::ViewChange, &view.view_type);
        e.view = Some(view);
        e
    }

    pub fn with_count(mut self, element_count: u32) -> Self {
        self.element_count = element_count;
        self
    }

    pub fn with_view(mut self, view: ViewContext) -> Self {
        self.view = Some(view);
        self
    }

    pub fn with_transaction(mut self, label: &str) -> Self {
        self.transaction = Some(label.to_string());
        self
    }

    pub fn with_details(mut self, details: ActionDetails) -> Self {
        self.details = details;
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn key(&self) -> ActionKey {
        ActionKey::new(self.kind, &self.category)
    }
}

/// `"{kind}|{category}"`, with an empty category written as `Unknown`.
/// Events with the same kind and category share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

pub const UNKNOWN_CATEGORY: &str = "Unknown";

impl ActionKey {
    pub fn new(kind: ActionKind, category: &str) -> Self {
        let category = category.trim();
        let category = if category.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            category
        };
        Self(format!("{}|{}", kind.as_str(), category))
    }

    /// Accepts `"Kind|Category"` or a bare kind. Never fails.
    pub fn parse(s: &str) -> Self {
        match s.split_once('|') {
            Some((kind, category)) => Self::new(ActionKind::parse(kind.trim()), category),
            None => Self::new(ActionKind::parse(s.trim()), ""),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> ActionKind {
        ActionKind::parse(self.0.split('|').next().unwrap_or_default())
    }

    pub fn category(&self) -> &str {
        self.0.split_once('|').map(|(_, c)| c).unwrap_or(UNKNOWN_CATEGORY)
    }

    /// "Add Walls" style label for human-facing text.
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind(), self.category())
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionKey {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
