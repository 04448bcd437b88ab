//! Rendering of edit operations into the hosted document API's batch-update
//! request shape.

use serde::Serialize;

use crate::operation::{EditOperation, StyleSpec};

pub const STYLE_FIELDS: &str = "*";
pub const POINT_UNIT: &str = "PT";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchUpdate {
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    InsertText(InsertTextRequest),
    UpdateTextStyle(UpdateTextStyleRequest),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertTextRequest {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyleRequest {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub magnitude: u32,
    pub unit: String,
}

impl From<StyleSpec> for TextStyle {
    fn from(style: StyleSpec) -> Self {
        TextStyle {
            bold: style.bold,
            font_size: style.font_size.map(|magnitude| Dimension {
                magnitude,
                unit: POINT_UNIT.to_string(),
            }),
        }
    }
}

impl From<&EditOperation> for Request {
    fn from(operation: &EditOperation) -> Self {
        match operation {
            // The paragraph break each insert implies is written out here; the
            // operation itself carries only the display text.
            EditOperation::InsertText { at, text } => Request::InsertText(InsertTextRequest {
                location: Location { index: *at },
                text: format!("{text}\n"),
            }),
            EditOperation::StyleRange { start, end, style } => {
                Request::UpdateTextStyle(UpdateTextStyleRequest {
                    range: Range {
                        start_index: *start,
                        end_index: *end,
                    },
                    text_style: TextStyle::from(*style),
                    fields: STYLE_FIELDS.to_string(),
                })
            }
        }
    }
}

impl BatchUpdate {
    pub fn from_operations(operations: &[EditOperation]) -> Self {
        BatchUpdate {
            requests: operations.iter().map(Request::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
