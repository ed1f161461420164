//! Instrument and drum-set map chain.
//!
//! `InstrumentList` and `DrumSetList` share one list type that renames itself
//! on emission; everything below them (`Map` → `PC` → `Bank` → `Tone`) shares
//! traversal regardless of which list owns it. Tones only occur in practice
//! under drum-set banks, but decode accepts them anywhere (shared traversal,
//! and unknown children are skipped, never rejected).

use crate::error::{DecodeError, ValidationError};
use crate::node::{self, Node};
use crate::xml::Element;

/// Ordered list of maps, emitted as `InstrumentList` or `DrumSetList`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapList {
    pub maps: Vec<Map>,
}

impl MapList {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for map in &self.maps {
            map.validate()?;
        }
        Ok(())
    }

    pub fn to_element(&self, tag: &str) -> Element {
        let mut el = Element::new(tag);
        for map in &self.maps {
            el.push_element(map.to_element());
        }
        el
    }

    pub fn encode(&self, tag: &str) -> Result<Element, ValidationError> {
        self.validate()?;
        Ok(self.to_element(tag))
    }

    pub fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut maps = Vec::new();
        for child in element.elements() {
            if child.name == "Map" {
                maps.push(Map::decode(child)?);
            }
        }
        Ok(Self { maps })
    }
}

/// A named map of program changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub name: String,
    pub pcs: Vec<ProgramChange>,
}

impl Node for Map {
    fn validate(&self) -> Result<(), ValidationError> {
        for pc in &self.pcs {
            pc.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Map");
        el.push_attr("Name", self.name.as_str());
        for pc in &self.pcs {
            el.push_element(pc.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let name = node::req_text(element, "Map", "Name")?;
        let mut pcs = Vec::new();
        for child in element.elements() {
            if child.name == "PC" {
                pcs.push(ProgramChange::decode(child)?);
            }
        }
        Ok(Self { name, pcs })
    }
}

/// A program change with its bank variants. Emitted as `PC`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgramChange {
    pub name: String,
    pub pc: i64,
    pub banks: Vec<Bank>,
}

impl Node for ProgramChange {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=128).contains(&self.pc) {
            return Err(ValidationError::out_of_range("PC", "PC", self.pc, 1, 128));
        }
        for bank in &self.banks {
            bank.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("PC");
        el.push_attr("Name", self.name.as_str());
        el.push_attr("PC", self.pc);
        for bank in &self.banks {
            el.push_element(bank.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let name = node::req_text(element, "PC", "Name")?;
        let pc = node::req_int(element, "PC", "PC")?;
        let mut banks = Vec::new();
        for child in element.elements() {
            if child.name == "Bank" {
                banks.push(Bank::decode(child)?);
            }
        }
        if banks.is_empty() {
            return Err(DecodeError::EmptyBankList { name });
        }
        Ok(Self { name, pc, banks })
    }
}

/// One bank variant of a program change.
#[derive(Clone, Debug, PartialEq)]
pub struct Bank {
    pub name: String,
    pub lsb: Option<i64>,
    pub msb: Option<i64>,
    /// Per-key tone names; populated by drum-set banks.
    pub tones: Vec<Tone>,
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lsb: None,
            msb: None,
            tones: Vec::new(),
        }
    }
}

impl Node for Bank {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(lsb) = self.lsb {
            if !(0..=255).contains(&lsb) {
                return Err(ValidationError::out_of_range("Bank", "LSB", lsb, 0, 255));
            }
        }
        if let Some(msb) = self.msb {
            if !(0..=255).contains(&msb) {
                return Err(ValidationError::out_of_range("Bank", "MSB", msb, 0, 255));
            }
        }
        for tone in &self.tones {
            tone.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Bank");
        el.push_attr("Name", self.name.as_str());
        el.push_attr_opt("LSB", self.lsb);
        el.push_attr_opt("MSB", self.msb);
        for tone in &self.tones {
            el.push_element(tone.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let name = node::req_text(element, "Bank", "Name")?;
        let lsb = node::opt_int(element, "Bank", "LSB")?;
        let msb = node::opt_int(element, "Bank", "MSB")?;
        let mut tones = Vec::new();
        for child in element.elements() {
            if child.name == "Tone" {
                tones.push(Tone::decode(child)?);
            }
        }
        Ok(Self {
            name,
            lsb,
            msb,
            tones,
        })
    }
}

/// A named key within a drum-set bank.
#[derive(Clone, Debug, PartialEq)]
pub struct Tone {
    pub name: String,
    pub key: i64,
}

impl Node for Tone {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=127).contains(&self.key) {
            return Err(ValidationError::out_of_range("Tone", "Key", self.key, 0, 127));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Tone");
        el.push_attr("Name", self.name.as_str());
        el.push_attr("Key", self.key);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node::req_text(element, "Tone", "Name")?,
            key: node::req_int(element, "Tone", "Key")?,
        })
    }
}
