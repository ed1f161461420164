//! The aggregate root: one module-definition document.
//!
//! `ModuleData` owns up to nine optional named sub-trees plus scalar
//! metadata. Decode dispatches each child element by tag; absent tags leave
//! their field unset, unknown tags are skipped. Encode emits present
//! sub-trees in fixed declaration order — never arrival order — and then
//! runs the consistency checker as a non-fatal diagnostic pass.

use crate::ccm::ControlChangeMacroList;
use crate::checker;
use crate::default_data::DefaultData;
use crate::defaults::{
    ControlChangeEventDefault, ExclusiveEventDefault, ProgramChangeEventPropertyDlg,
    RhythmTrackDefault,
};
use crate::error::{DecodeError, ValidationError};
use crate::instruments::MapList;
use crate::node::{self, Node};
use crate::template::TemplateList;
use crate::xml::Element;

/// Root document type of a module-definition file.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleData {
    pub name: String,
    pub folder: Option<String>,
    pub priority: Option<i64>,
    pub file_creator: Option<String>,
    pub file_version: Option<String>,
    pub web_site: Option<String>,

    pub rhythm_track_default: Option<RhythmTrackDefault>,
    pub exclusive_event_default: Option<ExclusiveEventDefault>,
    pub program_change_event_property_dlg: Option<ProgramChangeEventPropertyDlg>,
    pub control_change_event_default: Option<ControlChangeEventDefault>,
    pub instrument_list: Option<MapList>,
    pub drum_set_list: Option<MapList>,
    pub control_change_macro_list: Option<ControlChangeMacroList>,
    pub template_list: Option<TemplateList>,
    pub default_data: Option<DefaultData>,
}

impl ModuleData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: None,
            priority: None,
            file_creator: None,
            file_version: None,
            web_site: None,
            rhythm_track_default: None,
            exclusive_event_default: None,
            program_change_event_property_dlg: None,
            control_change_event_default: None,
            instrument_list: None,
            drum_set_list: None,
            control_change_macro_list: None,
            template_list: None,
            default_data: None,
        }
    }
}

impl Node for ModuleData {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(n) = &self.rhythm_track_default {
            n.validate()?;
        }
        if let Some(n) = &self.exclusive_event_default {
            n.validate()?;
        }
        if let Some(n) = &self.program_change_event_property_dlg {
            n.validate()?;
        }
        if let Some(n) = &self.control_change_event_default {
            n.validate()?;
        }
        if let Some(n) = &self.instrument_list {
            n.validate()?;
        }
        if let Some(n) = &self.drum_set_list {
            n.validate()?;
        }
        if let Some(n) = &self.control_change_macro_list {
            n.validate()?;
        }
        if let Some(n) = &self.template_list {
            n.validate()?;
        }
        if let Some(n) = &self.default_data {
            n.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("ModuleData");
        el.push_attr("Name", self.name.as_str());
        el.push_attr_opt("Folder", self.folder.as_deref());
        el.push_attr_opt("Priority", self.priority);
        el.push_attr_opt("FileCreator", self.file_creator.as_deref());
        el.push_attr_opt("FileVersion", self.file_version.as_deref());
        el.push_attr_opt("WebSite", self.web_site.as_deref());

        if let Some(n) = &self.rhythm_track_default {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.exclusive_event_default {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.program_change_event_property_dlg {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.control_change_event_default {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.instrument_list {
            el.push_element(n.to_element("InstrumentList"));
        }
        if let Some(n) = &self.drum_set_list {
            el.push_element(n.to_element("DrumSetList"));
        }
        if let Some(n) = &self.control_change_macro_list {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.template_list {
            el.push_element(n.to_element());
        }
        if let Some(n) = &self.default_data {
            el.push_element(n.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut module = Self::new(node::req_text(element, "ModuleData", "Name")?);
        module.folder = node::opt_text(element, "Folder");
        module.priority = node::opt_int(element, "ModuleData", "Priority")?;
        module.file_creator = node::opt_text(element, "FileCreator");
        module.file_version = node::opt_text(element, "FileVersion");
        module.web_site = node::opt_text(element, "WebSite");

        for child in element.elements() {
            match child.name.as_str() {
                "RhythmTrackDefault" => {
                    module.rhythm_track_default = Some(RhythmTrackDefault::decode(child)?);
                }
                "ExclusiveEventDefault" => {
                    module.exclusive_event_default = Some(ExclusiveEventDefault::decode(child)?);
                }
                "ProgramChangeEventPropertyDlg" => {
                    module.program_change_event_property_dlg =
                        Some(ProgramChangeEventPropertyDlg::decode(child)?);
                }
                "ControlChangeEventDefault" => {
                    module.control_change_event_default =
                        Some(ControlChangeEventDefault::decode(child)?);
                }
                "InstrumentList" => module.instrument_list = Some(MapList::decode(child)?),
                "DrumSetList" => module.drum_set_list = Some(MapList::decode(child)?),
                "ControlChangeMacroList" => {
                    module.control_change_macro_list =
                        Some(ControlChangeMacroList::decode(child)?);
                }
                "TemplateList" => module.template_list = Some(TemplateList::decode(child)?),
                "DefaultData" => module.default_data = Some(DefaultData::decode(child)?),
                // Forward compatibility: unrecognized tags are skipped.
                _ => {}
            }
        }
        Ok(module)
    }

    fn encode(&self) -> Result<Element, ValidationError> {
        self.validate()?;
        // Diagnostics only. Findings are logged and never block encoding.
        if let Some(list) = &self.control_change_macro_list {
            checker::check(list).log();
        }
        Ok(self.to_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccm::{Ccm, MacroItem};
    use crate::instruments::{Bank, Map, ProgramChange};

    fn sample() -> ModuleData {
        let mut module = ModuleData::new("SC-8850");
        module.folder = Some("Roland".to_string());
        module.priority = Some(100);
        module.rhythm_track_default = Some(RhythmTrackDefault { gate: 1 });
        module.instrument_list = Some(MapList {
            maps: vec![Map {
                name: "Native".to_string(),
                pcs: vec![ProgramChange {
                    name: "Piano 1".to_string(),
                    pc: 1,
                    banks: vec![Bank::new("CC#32 0")],
                }],
            }],
        });
        module.control_change_macro_list = Some(ControlChangeMacroList {
            items: vec![MacroItem::Ccm(Ccm::new(7, "Volume"))],
        });
        module
    }

    #[test]
    fn name_is_required() {
        let el = Element::new("ModuleData");
        let err = ModuleData::decode(&el).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingAttribute { entity: "ModuleData", attribute: "Name" }
        ));
    }

    #[test]
    fn sub_trees_emit_in_declaration_order() {
        let mut module = sample();
        module.default_data = Some(DefaultData::default());
        let el = module.encode().expect("encode");
        let tags: Vec<_> = el.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            tags,
            [
                "RhythmTrackDefault",
                "InstrumentList",
                "ControlChangeMacroList",
                "DefaultData",
            ]
        );
    }

    #[test]
    fn unrecognized_child_is_skipped() {
        let mut el = sample().encode().expect("encode");
        el.push_element(Element::new("NewFangledList"));
        let module = ModuleData::decode(&el).expect("decode");
        assert_eq!(module, sample());
    }

    #[test]
    fn round_trips_all_populated_fields() {
        let module = sample();
        let el = module.encode().expect("encode");
        assert_eq!(ModuleData::decode(&el).expect("decode"), module);
    }

    #[test]
    fn encode_fails_closed_on_invalid_sub_tree() {
        let mut module = sample();
        module.default_data = Some(DefaultData {
            items: vec![crate::default_data::DefaultDataItem::Mark(
                crate::default_data::Mark { meas: 0, name: None },
            )],
        });
        assert!(module.encode().is_err());
    }
}
