//! Single-scalar default nodes of the aggregate root.

use crate::error::{DecodeError, ValidationError};
use crate::node::{self, Node};
use crate::xml::Element;

/// Default gate time for newly created rhythm tracks.
#[derive(Clone, Debug, PartialEq)]
pub struct RhythmTrackDefault {
    pub gate: i64,
}

impl Node for RhythmTrackDefault {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("RhythmTrackDefault");
        el.push_attr("Gate", self.gate);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            gate: node::req_int(element, "RhythmTrackDefault", "Gate")?,
        })
    }
}

/// Default payload for newly created system-exclusive events.
#[derive(Clone, Debug, PartialEq)]
pub struct ExclusiveEventDefault {
    pub data: String,
}

impl Node for ExclusiveEventDefault {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("ExclusiveEventDefault");
        el.push_attr("Data", self.data.as_str());
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            data: node::req_text(element, "ExclusiveEventDefault", "Data")?,
        })
    }
}

/// Auto-preview delay used by the program-change property dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramChangeEventPropertyDlg {
    pub auto_preview_delay: i64,
}

impl Node for ProgramChangeEventPropertyDlg {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("ProgramChangeEventPropertyDlg");
        el.push_attr("AutoPreviewDelay", self.auto_preview_delay);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            auto_preview_delay: node::req_int(
                element,
                "ProgramChangeEventPropertyDlg",
                "AutoPreviewDelay",
            )?,
        })
    }
}

/// Default controller number for newly created control-change events.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlChangeEventDefault {
    pub id: i64,
}

impl Node for ControlChangeEventDefault {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("ControlChangeEventDefault");
        el.push_attr("ID", self.id);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node::req_int(element, "ControlChangeEventDefault", "ID")?,
        })
    }
}
