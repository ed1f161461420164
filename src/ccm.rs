//! Control-change-macro subtree.
//!
//! The deepest recursive structure in the model. A folder may contain any
//! mixture of nested folders, folder links, macros, macro links, lookup
//! tables, and free-text memos. The mixture is a closed tagged union
//! ([`MacroItem`]) dispatched by one exhaustive match in each direction, which
//! keeps the unknown-tag skip policy and the fixed attribute order in one
//! place. Memos are plain text, not entities — they carry no identity of
//! their own.
//!
//! `Value` and `Gate` share one implementation ([`ValueSpec`]) parameterized
//! by the emitted tag name.

use crate::error::{DecodeError, ValidationError};
use crate::node::{self, Node};
use crate::xml::Element;

/// Top-level macro list of the aggregate root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlChangeMacroList {
    pub items: Vec<MacroItem>,
}

impl Node for ControlChangeMacroList {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_items(&self.items)
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("ControlChangeMacroList");
        emit_items(&self.items, &mut el);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            items: decode_items(element)?,
        })
    }
}

/// One entry of a macro list or folder.
#[derive(Clone, Debug, PartialEq)]
pub enum MacroItem {
    Folder(CcmFolder),
    FolderLink(FolderLink),
    Ccm(Ccm),
    CcmLink(CcmLink),
    Table(Table),
    /// Free-text memo, carried by a `Memo` child.
    Memo(String),
}

fn decode_items(element: &Element) -> Result<Vec<MacroItem>, DecodeError> {
    let mut items = Vec::new();
    for child in element.elements() {
        match child.name.as_str() {
            "Folder" => items.push(MacroItem::Folder(CcmFolder::decode(child)?)),
            "FolderLink" => items.push(MacroItem::FolderLink(FolderLink::decode(child)?)),
            "CCM" => items.push(MacroItem::Ccm(Ccm::decode(child)?)),
            "CCMLink" => items.push(MacroItem::CcmLink(CcmLink::decode(child)?)),
            "Table" => items.push(MacroItem::Table(Table::decode(child)?)),
            "Memo" => items.push(MacroItem::Memo(child.text().unwrap_or_default())),
            // Unknown tags are skipped, not rejected.
            _ => {}
        }
    }
    Ok(items)
}

fn emit_items(items: &[MacroItem], parent: &mut Element) {
    for item in items {
        match item {
            MacroItem::Folder(f) => parent.push_element(f.to_element()),
            MacroItem::FolderLink(l) => parent.push_element(l.to_element()),
            MacroItem::Ccm(c) => parent.push_element(c.to_element()),
            MacroItem::CcmLink(l) => parent.push_element(l.to_element()),
            MacroItem::Table(t) => parent.push_element(t.to_element()),
            MacroItem::Memo(text) => {
                let mut el = Element::new("Memo");
                if !text.is_empty() {
                    el.push_text(text.as_str());
                }
                parent.push_element(el);
            }
        }
    }
}

fn validate_items(items: &[MacroItem]) -> Result<(), ValidationError> {
    for item in items {
        match item {
            MacroItem::Folder(f) => f.validate()?,
            MacroItem::FolderLink(l) => l.validate()?,
            MacroItem::Ccm(c) => c.validate()?,
            MacroItem::CcmLink(l) => l.validate()?,
            MacroItem::Table(t) => t.validate()?,
            MacroItem::Memo(_) => {}
        }
    }
    Ok(())
}

/// A recursive grouping folder.
#[derive(Clone, Debug, PartialEq)]
pub struct CcmFolder {
    pub name: String,
    pub id: Option<i64>,
    pub items: Vec<MacroItem>,
}

impl CcmFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            items: Vec::new(),
        }
    }
}

impl Node for CcmFolder {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_items(&self.items)
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Folder");
        el.push_attr("Name", self.name.as_str());
        el.push_attr_opt("ID", self.id);
        emit_items(&self.items, &mut el);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node::req_text(element, "Folder", "Name")?,
            id: node::opt_int(element, "Folder", "ID")?,
            items: decode_items(element)?,
        })
    }
}

/// A link to a folder defined elsewhere in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderLink {
    pub name: String,
    pub id: i64,
    pub value: Option<i64>,
    pub gate: Option<i64>,
}

impl Node for FolderLink {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("FolderLink");
        el.push_attr("Name", self.name.as_str());
        el.push_attr("ID", self.id);
        el.push_attr_opt("Value", self.value);
        el.push_attr_opt("Gate", self.gate);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node::req_text(element, "FolderLink", "Name")?,
            id: node::req_int(element, "FolderLink", "ID")?,
            value: node::opt_int(element, "FolderLink", "Value")?,
            gate: node::opt_int(element, "FolderLink", "Gate")?,
        })
    }
}

/// Synchronization mode of a macro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    Last,
    LastEachGate,
}

impl SyncMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last => "Last",
            Self::LastEachGate => "LastEachGate",
        }
    }

    fn parse(value: &str) -> Result<Self, DecodeError> {
        match value {
            "Last" => Ok(Self::Last),
            "LastEachGate" => Ok(Self::LastEachGate),
            other => Err(DecodeError::bad_enum("CCM", "Sync", other)),
        }
    }
}

/// A control-change macro. Emitted as `CCM`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ccm {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub sync: Option<SyncMode>,
    pub value: Option<ValueSpec>,
    pub gate: Option<ValueSpec>,
    pub data: Option<String>,
    pub memo: Option<String>,
}

impl Ccm {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            sync: None,
            value: None,
            gate: None,
            data: None,
            memo: None,
        }
    }
}

impl Node for Ccm {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=1300).contains(&self.id) {
            return Err(ValidationError::out_of_range("CCM", "ID", self.id, 0, 1300));
        }
        if let Some(color) = &self.color {
            if !color.starts_with('#') {
                return Err(ValidationError::bad_format(
                    "CCM",
                    "Color",
                    color.as_str(),
                    "a #-prefixed color code",
                ));
            }
        }
        if let Some(value) = &self.value {
            value.validate()?;
        }
        if let Some(gate) = &self.gate {
            gate.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("CCM");
        el.push_attr("ID", self.id);
        el.push_attr("Name", self.name.as_str());
        el.push_attr_opt("Color", self.color.as_deref());
        el.push_attr_opt("Sync", self.sync.map(SyncMode::as_str));
        if let Some(value) = &self.value {
            el.push_element(value.to_element("Value"));
        }
        if let Some(gate) = &self.gate {
            el.push_element(gate.to_element("Gate"));
        }
        if let Some(data) = &self.data {
            let mut child = Element::new("Data");
            if !data.is_empty() {
                child.push_text(data.as_str());
            }
            el.push_element(child);
        }
        if let Some(memo) = &self.memo {
            let mut child = Element::new("Memo");
            if !memo.is_empty() {
                child.push_text(memo.as_str());
            }
            el.push_element(child);
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut ccm = Self::new(
            node::req_int(element, "CCM", "ID")?,
            node::req_text(element, "CCM", "Name")?,
        );
        ccm.color = node::opt_text(element, "Color");
        ccm.sync = match node::opt_text(element, "Sync") {
            Some(raw) => Some(SyncMode::parse(&raw)?),
            None => None,
        };
        for child in element.elements() {
            match child.name.as_str() {
                "Value" => ccm.value = Some(ValueSpec::decode(child, "Value")?),
                "Gate" => ccm.gate = Some(ValueSpec::decode(child, "Gate")?),
                "Data" => ccm.data = Some(child.text().unwrap_or_default()),
                "Memo" => ccm.memo = Some(child.text().unwrap_or_default()),
                _ => {}
            }
        }
        Ok(ccm)
    }
}

/// A link to a macro defined elsewhere in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct CcmLink {
    pub id: i64,
    pub value: Option<i64>,
    pub gate: Option<i64>,
}

impl Node for CcmLink {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=1300).contains(&self.id) {
            return Err(ValidationError::out_of_range(
                "CCMLink", "ID", self.id, 0, 1300,
            ));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("CCMLink");
        el.push_attr("ID", self.id);
        el.push_attr_opt("Value", self.value);
        el.push_attr_opt("Gate", self.gate);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node::req_int(element, "CCMLink", "ID")?,
            value: node::opt_int(element, "CCMLink", "Value")?,
            gate: node::opt_int(element, "CCMLink", "Gate")?,
        })
    }
}

/// Value or gate range of a macro, with optional lookup entries.
///
/// One implementation serves both `Value` and `Gate`; the tag is chosen at
/// emission. The `entity` argument on decode keeps diagnostics named after
/// the tag that was actually read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueSpec {
    pub default: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub offset: Option<i64>,
    pub name: Option<String>,
    pub value_type: Option<String>,
    pub table_id: Option<i64>,
    pub entries: Vec<Entry>,
}

impl ValueSpec {
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Entries are only bounded when both bounds are declared.
        if let (Some(min), Some(max)) = (self.min, self.max) {
            for entry in &self.entries {
                if entry.value < min || entry.value > max {
                    return Err(ValidationError::EntryOutOfBounds {
                        label: entry.label.clone(),
                        value: entry.value,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn to_element(&self, tag: &str) -> Element {
        let mut el = Element::new(tag);
        el.push_attr_opt("Default", self.default);
        el.push_attr_opt("Min", self.min);
        el.push_attr_opt("Max", self.max);
        el.push_attr_opt("Offset", self.offset);
        el.push_attr_opt("Name", self.name.as_deref());
        el.push_attr_opt("Type", self.value_type.as_deref());
        el.push_attr_opt("TableID", self.table_id);
        for entry in &self.entries {
            el.push_element(entry.to_element());
        }
        el
    }

    pub fn decode(element: &Element, entity: &'static str) -> Result<Self, DecodeError> {
        let mut spec = Self {
            default: node::opt_int(element, entity, "Default")?,
            min: node::opt_int(element, entity, "Min")?,
            max: node::opt_int(element, entity, "Max")?,
            offset: node::opt_int(element, entity, "Offset")?,
            name: node::opt_text(element, "Name"),
            value_type: node::opt_text(element, "Type"),
            table_id: node::opt_int(element, entity, "TableID")?,
            entries: Vec::new(),
        };
        for child in element.elements() {
            if child.name == "Entry" {
                spec.entries.push(Entry::decode(child)?);
            }
        }
        Ok(spec)
    }
}

/// A label/value pair used as a lookup-table row.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub label: String,
    pub value: i64,
}

impl Node for Entry {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Entry");
        el.push_attr("Label", self.label.as_str());
        el.push_attr("Value", self.value);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            label: node::req_text(element, "Entry", "Label")?,
            value: node::req_int(element, "Entry", "Value")?,
        })
    }
}

/// A standalone lookup table, referenced by `TableID`.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    pub id: i64,
    pub entries: Vec<Entry>,
}

impl Node for Table {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id < 0 {
            return Err(ValidationError::out_of_range(
                "Table",
                "ID",
                self.id,
                0,
                i64::MAX,
            ));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Table");
        el.push_attr("ID", self.id);
        for entry in &self.entries {
            el.push_element(entry.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let id = node::req_int(element, "Table", "ID")?;
        let mut entries = Vec::new();
        for child in element.elements() {
            if child.name == "Entry" {
                entries.push(Entry::decode(child)?);
            }
        }
        Ok(Self { id, entries })
    }
}
