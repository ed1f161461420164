//! Template subtree.
//!
//! Structurally parallel to the macro subtree but simpler: folders nest
//! folders and templates; a template owns an ordered heterogeneous sequence
//! of memo, control-change, program-change, and comment entries. No
//! consistency pass runs over this subtree.
//!
//! [`CcEvent`], [`PcEvent`], and [`Comment`] are defined here and reused by
//! the default-data track stream — same tags, same attribute order, one
//! implementation.

use crate::error::{DecodeError, ValidationError};
use crate::node::{self, Node};
use crate::xml::Element;

/// Top-level template list of the aggregate root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateList {
    pub items: Vec<TemplateItem>,
}

impl Node for TemplateList {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_items(&self.items)
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("TemplateList");
        emit_items(&self.items, &mut el);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            items: decode_items(element)?,
        })
    }
}

/// One entry of a template list or folder.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateItem {
    Folder(TemplateFolder),
    Template(Template),
}

fn decode_items(element: &Element) -> Result<Vec<TemplateItem>, DecodeError> {
    let mut items = Vec::new();
    for child in element.elements() {
        match child.name.as_str() {
            "Folder" => items.push(TemplateItem::Folder(TemplateFolder::decode(child)?)),
            "Template" => items.push(TemplateItem::Template(Template::decode(child)?)),
            _ => {}
        }
    }
    Ok(items)
}

fn emit_items(items: &[TemplateItem], parent: &mut Element) {
    for item in items {
        match item {
            TemplateItem::Folder(f) => parent.push_element(f.to_element()),
            TemplateItem::Template(t) => parent.push_element(t.to_element()),
        }
    }
}

fn validate_items(items: &[TemplateItem]) -> Result<(), ValidationError> {
    for item in items {
        match item {
            TemplateItem::Folder(f) => f.validate()?,
            TemplateItem::Template(t) => t.validate()?,
        }
    }
    Ok(())
}

/// A recursive grouping folder for templates.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateFolder {
    pub name: String,
    pub items: Vec<TemplateItem>,
}

impl TemplateFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }
}

impl Node for TemplateFolder {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_items(&self.items)
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Folder");
        el.push_attr("Name", self.name.as_str());
        emit_items(&self.items, &mut el);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node::req_text(element, "Folder", "Name")?,
            items: decode_items(element)?,
        })
    }
}

/// A named, optionally numbered event template.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub id: Option<i64>,
    pub name: String,
    pub items: Vec<TemplateEvent>,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            items: Vec::new(),
        }
    }
}

impl Node for Template {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.id {
            if id < 0 {
                return Err(ValidationError::out_of_range(
                    "Template",
                    "ID",
                    id,
                    0,
                    i64::MAX,
                ));
            }
        }
        for item in &self.items {
            match item {
                TemplateEvent::Memo(_) => {}
                TemplateEvent::Cc(cc) => cc.validate()?,
                TemplateEvent::Pc(pc) => pc.validate()?,
                TemplateEvent::Comment(c) => c.validate()?,
            }
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Template");
        el.push_attr_opt("ID", self.id);
        el.push_attr("Name", self.name.as_str());
        for item in &self.items {
            match item {
                TemplateEvent::Memo(text) => {
                    let mut memo = Element::new("Memo");
                    if !text.is_empty() {
                        memo.push_text(text.as_str());
                    }
                    el.push_element(memo);
                }
                TemplateEvent::Cc(cc) => el.push_element(cc.to_element()),
                TemplateEvent::Pc(pc) => el.push_element(pc.to_element()),
                TemplateEvent::Comment(c) => el.push_element(c.to_element()),
            }
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut template = Self::new(node::req_text(element, "Template", "Name")?);
        template.id = node::opt_int(element, "Template", "ID")?;
        for child in element.elements() {
            match child.name.as_str() {
                "Memo" => template
                    .items
                    .push(TemplateEvent::Memo(child.text().unwrap_or_default())),
                "CC" => template.items.push(TemplateEvent::Cc(CcEvent::decode(child)?)),
                "PC" => template.items.push(TemplateEvent::Pc(PcEvent::decode(child)?)),
                "Comment" => template
                    .items
                    .push(TemplateEvent::Comment(Comment::decode(child)?)),
                _ => {}
            }
        }
        Ok(template)
    }
}

/// One ordered entry of a template.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateEvent {
    Memo(String),
    Cc(CcEvent),
    Pc(PcEvent),
    Comment(Comment),
}

/// A control-change event. Emitted as `CC`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CcEvent {
    pub id: Option<i64>,
    pub value: Option<i64>,
    pub gate: Option<i64>,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for CcEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("CC");
        el.push_attr_opt("ID", self.id);
        el.push_attr_opt("Value", self.value);
        el.push_attr_opt("Gate", self.gate);
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node::opt_int(element, "CC", "ID")?,
            value: node::opt_int(element, "CC", "Value")?,
            gate: node::opt_int(element, "CC", "Gate")?,
            tick: node::opt_int(element, "CC", "Tick")?,
            step: node::opt_int(element, "CC", "Step")?,
        })
    }
}

/// Bank-select mode of a program-change event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcMode {
    Drumset,
    Auto,
}

impl PcMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drumset => "Drumset",
            Self::Auto => "Auto",
        }
    }

    fn parse(value: &str) -> Result<Self, DecodeError> {
        match value {
            "Drumset" => Ok(Self::Drumset),
            "Auto" => Ok(Self::Auto),
            other => Err(DecodeError::bad_enum("PC", "Mode", other)),
        }
    }
}

/// A program-change event. Emitted as `PC`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PcEvent {
    pub pc: Option<i64>,
    pub msb: Option<i64>,
    pub lsb: Option<i64>,
    pub mode: Option<PcMode>,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for PcEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(pc) = self.pc {
            if !(1..=128).contains(&pc) {
                return Err(ValidationError::out_of_range("PC", "PC", pc, 1, 128));
            }
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("PC");
        el.push_attr_opt("PC", self.pc);
        el.push_attr_opt("MSB", self.msb);
        el.push_attr_opt("LSB", self.lsb);
        el.push_attr_opt("Mode", self.mode.map(PcMode::as_str));
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            pc: node::opt_int(element, "PC", "PC")?,
            msb: node::opt_int(element, "PC", "MSB")?,
            lsb: node::opt_int(element, "PC", "LSB")?,
            mode: match node::opt_text(element, "Mode") {
                Some(raw) => Some(PcMode::parse(&raw)?),
                None => None,
            },
            tick: node::opt_int(element, "PC", "Tick")?,
            step: node::opt_int(element, "PC", "Step")?,
        })
    }
}

/// A comment event. Emitted as `Comment`.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub text: String,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for Comment {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Comment");
        el.push_attr("Text", self.text.as_str());
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            text: node::req_text(element, "Comment", "Text")?,
            tick: node::opt_int(element, "Comment", "Tick")?,
            step: node::opt_int(element, "Comment", "Step")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), true)]
    #[case(Some(128), true)]
    #[case(Some(0), false)]
    #[case(Some(129), false)]
    #[case(None, true)]
    fn pc_event_program_range(#[case] pc: Option<i64>, #[case] ok: bool) {
        let event = PcEvent {
            pc,
            ..PcEvent::default()
        };
        assert_eq!(event.validate().is_ok(), ok);
    }

    #[test]
    fn template_id_must_be_non_negative_when_present() {
        let mut template = Template::new("Setup");
        template.id = Some(-1);
        assert!(template.validate().is_err());
        template.id = None;
        assert!(template.validate().is_ok());
    }

    #[test]
    fn unknown_pc_mode_is_a_decode_error() {
        let mut el = Element::new("PC");
        el.push_attr("Mode", "Melodic");
        let err = PcEvent::decode(&el).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BadEnum { attribute: "Mode", .. }
        ));
    }

    #[test]
    fn template_round_trips_ordered_mixture() {
        let mut template = Template::new("GM Reset");
        template.id = Some(1);
        template.items.push(TemplateEvent::Memo("send first".to_string()));
        template.items.push(TemplateEvent::Pc(PcEvent {
            pc: Some(1),
            msb: Some(0),
            lsb: Some(0),
            mode: Some(PcMode::Auto),
            ..PcEvent::default()
        }));
        template.items.push(TemplateEvent::Cc(CcEvent {
            id: Some(7),
            value: Some(100),
            ..CcEvent::default()
        }));
        template.items.push(TemplateEvent::Comment(Comment {
            text: "volume reset".to_string(),
            tick: None,
            step: None,
        }));

        let folder = TemplateFolder {
            name: "Setup".to_string(),
            items: vec![TemplateItem::Template(template)],
        };
        let list = TemplateList {
            items: vec![TemplateItem::Folder(folder)],
        };

        let el = list.encode().expect("encode");
        assert_eq!(TemplateList::decode(&el).expect("decode"), list);
    }
}
