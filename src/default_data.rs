//! Default song data: marks and tracks seeded into new files.
//!
//! A track owns a time-ordered, heterogeneous event stream. The nine event
//! kinds form a closed union dispatched by one exhaustive match in each
//! direction, so stream order survives decode/encode exactly.
//!
//! Tempo is the one lossy field in the whole model: encode re-quantizes the
//! value to exactly three decimal places regardless of input precision.

use crate::error::{DecodeError, ValidationError};
use crate::node::{self, Node};
use crate::template::{CcEvent, Comment, PcEvent};
use crate::xml::Element;

/// Default-data subtree of the aggregate root.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultData {
    pub items: Vec<DefaultDataItem>,
}

/// One ordered entry of the default data.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultDataItem {
    Mark(Mark),
    Track(Track),
}

impl Node for DefaultData {
    fn validate(&self) -> Result<(), ValidationError> {
        for item in &self.items {
            match item {
                DefaultDataItem::Mark(m) => m.validate()?,
                DefaultDataItem::Track(t) => t.validate()?,
            }
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("DefaultData");
        for item in &self.items {
            match item {
                DefaultDataItem::Mark(m) => el.push_element(m.to_element()),
                DefaultDataItem::Track(t) => el.push_element(t.to_element()),
            }
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut items = Vec::new();
        for child in element.elements() {
            match child.name.as_str() {
                "Mark" => items.push(DefaultDataItem::Mark(Mark::decode(child)?)),
                "Track" => items.push(DefaultDataItem::Track(Track::decode(child)?)),
                _ => {}
            }
        }
        Ok(Self { items })
    }
}

/// A measure-positioned mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    pub meas: i64,
    pub name: Option<String>,
}

impl Node for Mark {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.meas < 1 {
            return Err(ValidationError::out_of_range(
                "Mark",
                "Meas",
                self.meas,
                1,
                i64::MAX,
            ));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Mark");
        el.push_attr("Meas", self.meas);
        el.push_attr_opt("Name", self.name.as_deref());
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            meas: node::req_int(element, "Mark", "Meas")?,
            name: node::opt_text(element, "Name"),
        })
    }
}

/// Playback mode of a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackMode {
    Conductor,
    Rhythm,
}

impl TrackMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conductor => "Conductor",
            Self::Rhythm => "Rhythm",
        }
    }

    fn parse(value: &str) -> Result<Self, DecodeError> {
        match value {
            "Conductor" => Ok(Self::Conductor),
            "Rhythm" => Ok(Self::Rhythm),
            other => Err(DecodeError::bad_enum("Track", "Mode", other)),
        }
    }
}

/// A default track with its seeded event stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub ch: Option<i64>,
    pub mode: Option<TrackMode>,
    pub current: Option<i64>,
    pub events: Vec<TrackEvent>,
}

impl Node for Track {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ch) = self.ch {
            if !(1..=16).contains(&ch) {
                return Err(ValidationError::out_of_range("Track", "Ch", ch, 1, 16));
            }
        }
        for event in &self.events {
            event.validate()?;
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Track");
        el.push_attr_opt("Name", self.name.as_deref());
        el.push_attr_opt("Ch", self.ch);
        el.push_attr_opt("Mode", self.mode.map(TrackMode::as_str));
        el.push_attr_opt("Current", self.current);
        for event in &self.events {
            el.push_element(event.to_element());
        }
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let mut track = Self {
            name: node::opt_text(element, "Name"),
            ch: node::opt_int(element, "Track", "Ch")?,
            mode: match node::opt_text(element, "Mode") {
                Some(raw) => Some(TrackMode::parse(&raw)?),
                None => None,
            },
            current: node::opt_int(element, "Track", "Current")?,
            events: Vec::new(),
        };
        for child in element.elements() {
            if let Some(event) = TrackEvent::decode_tag(child)? {
                track.events.push(event);
            }
        }
        Ok(track)
    }
}

/// One event of a track stream. Order among events is meaningful.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackEvent {
    Mark(TrackMark),
    Tempo(Tempo),
    TimeSignature(TimeSignature),
    KeySignature(KeySignature),
    Cc(CcEvent),
    Pc(PcEvent),
    Comment(Comment),
    Template(TemplateRef),
    Eot(Eot),
}

impl TrackEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Mark(e) => e.validate(),
            Self::Tempo(e) => e.validate(),
            Self::TimeSignature(e) => e.validate(),
            Self::KeySignature(e) => e.validate(),
            Self::Cc(e) => e.validate(),
            Self::Pc(e) => e.validate(),
            Self::Comment(e) => e.validate(),
            Self::Template(e) => e.validate(),
            Self::Eot(e) => e.validate(),
        }
    }

    fn to_element(&self) -> Element {
        match self {
            Self::Mark(e) => e.to_element(),
            Self::Tempo(e) => e.to_element(),
            Self::TimeSignature(e) => e.to_element(),
            Self::KeySignature(e) => e.to_element(),
            Self::Cc(e) => e.to_element(),
            Self::Pc(e) => e.to_element(),
            Self::Comment(e) => e.to_element(),
            Self::Template(e) => e.to_element(),
            Self::Eot(e) => e.to_element(),
        }
    }

    /// Decode a child by tag, or `None` for an unrecognized tag.
    fn decode_tag(element: &Element) -> Result<Option<Self>, DecodeError> {
        let event = match element.name.as_str() {
            "Mark" => Self::Mark(TrackMark::decode(element)?),
            "Tempo" => Self::Tempo(Tempo::decode(element)?),
            "TimeSignature" => Self::TimeSignature(TimeSignature::decode(element)?),
            "KeySignature" => Self::KeySignature(KeySignature::decode(element)?),
            "CC" => Self::Cc(CcEvent::decode(element)?),
            "PC" => Self::Pc(PcEvent::decode(element)?),
            "Comment" => Self::Comment(Comment::decode(element)?),
            "Template" => Self::Template(TemplateRef::decode(element)?),
            "EOT" => Self::Eot(Eot::decode(element)?),
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// A tick-positioned mark event inside a track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackMark {
    pub name: Option<String>,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for TrackMark {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Mark");
        el.push_attr_opt("Name", self.name.as_deref());
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node::opt_text(element, "Name"),
            tick: node::opt_int(element, "Mark", "Tick")?,
            step: node::opt_int(element, "Mark", "Step")?,
        })
    }
}

/// A tempo event. Encode re-quantizes to three decimal places.
#[derive(Clone, Debug, PartialEq)]
pub struct Tempo {
    pub tempo: f64,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for Tempo {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Tempo");
        // Fixed three decimals regardless of input precision. Emitted as a
        // preformatted string so the serializer cannot reformat it.
        el.push_attr("Tempo", format!("{:.3}", self.tempo));
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            tempo: node::req_float(element, "Tempo", "Tempo")?,
            tick: node::opt_int(element, "Tempo", "Tick")?,
            step: node::opt_int(element, "Tempo", "Step")?,
        })
    }
}

/// A time-signature event. The text must match `digits("/"digits)*`.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSignature {
    pub time_signature: String,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl TimeSignature {
    fn text_is_valid(text: &str) -> bool {
        !text.is_empty()
            && text.split('/').all(|part| {
                !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
            })
    }
}

impl Node for TimeSignature {
    fn validate(&self) -> Result<(), ValidationError> {
        if !Self::text_is_valid(&self.time_signature) {
            return Err(ValidationError::bad_format(
                "TimeSignature",
                "TimeSignature",
                self.time_signature.as_str(),
                "digits separated by \"/\"",
            ));
        }
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("TimeSignature");
        el.push_attr("TimeSignature", self.time_signature.as_str());
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            time_signature: node::req_text(element, "TimeSignature", "TimeSignature")?,
            tick: node::opt_int(element, "TimeSignature", "Tick")?,
            step: node::opt_int(element, "TimeSignature", "Step")?,
        })
    }
}

/// A key-signature event.
#[derive(Clone, Debug, PartialEq)]
pub struct KeySignature {
    pub key_signature: String,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for KeySignature {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("KeySignature");
        el.push_attr("KeySignature", self.key_signature.as_str());
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            key_signature: node::req_text(element, "KeySignature", "KeySignature")?,
            tick: node::opt_int(element, "KeySignature", "Tick")?,
            step: node::opt_int(element, "KeySignature", "Step")?,
        })
    }
}

/// A reference to a template by id. Emitted as `Template`.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRef {
    pub id: i64,
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for TemplateRef {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("Template");
        el.push_attr("ID", self.id);
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            id: node::req_int(element, "Template", "ID")?,
            tick: node::opt_int(element, "Template", "Tick")?,
            step: node::opt_int(element, "Template", "Step")?,
        })
    }
}

/// End-of-track marker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Eot {
    pub tick: Option<i64>,
    pub step: Option<i64>,
}

impl Node for Eot {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("EOT");
        el.push_attr_opt("Tick", self.tick);
        el.push_attr_opt("Step", self.step);
        el
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        Ok(Self {
            tick: node::opt_int(element, "EOT", "Tick")?,
            step: node::opt_int(element, "EOT", "Step")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::AttrValue;
    use rstest::rstest;

    #[rstest]
    #[case("4/4", true)]
    #[case("12", true)]
    #[case("3/4/8", true)]
    #[case("4/4x", false)]
    #[case("/4", false)]
    #[case("", false)]
    fn time_signature_grammar(#[case] text: &str, #[case] ok: bool) {
        let event = TimeSignature {
            time_signature: text.to_string(),
            tick: None,
            step: None,
        };
        assert_eq!(event.validate().is_ok(), ok);
    }

    #[rstest]
    #[case(1, true)]
    #[case(0, false)]
    #[case(-3, false)]
    fn mark_measure_must_be_positive(#[case] meas: i64, #[case] ok: bool) {
        let mark = Mark { meas, name: None };
        assert_eq!(mark.validate().is_ok(), ok);
    }

    #[rstest]
    #[case(Some(1), true)]
    #[case(Some(16), true)]
    #[case(Some(0), false)]
    #[case(Some(17), false)]
    #[case(None, true)]
    fn track_channel_range(#[case] ch: Option<i64>, #[case] ok: bool) {
        let track = Track {
            ch,
            ..Track::default()
        };
        assert_eq!(track.validate().is_ok(), ok);
    }

    #[test]
    fn tempo_encodes_three_decimals() {
        let tempo = Tempo {
            tempo: 120.0,
            tick: None,
            step: None,
        };
        let el = tempo.encode().expect("encode");
        assert_eq!(
            el.attr("Tempo"),
            Some(&AttrValue::Text("120.000".to_string()))
        );

        let tempo = Tempo {
            tempo: 133.33333,
            tick: Some(0),
            step: None,
        };
        let el = tempo.encode().expect("encode");
        assert_eq!(
            el.attr("Tempo"),
            Some(&AttrValue::Text("133.333".to_string()))
        );
    }

    #[test]
    fn unknown_track_mode_is_a_decode_error() {
        let mut el = Element::new("Track");
        el.push_attr("Mode", "Freestyle");
        let err = Track::decode(&el).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BadEnum { entity: "Track", attribute: "Mode", .. }
        ));
    }

    #[test]
    fn event_stream_order_is_preserved() {
        let track = Track {
            name: Some("Conductor".to_string()),
            mode: Some(TrackMode::Conductor),
            events: vec![
                TrackEvent::TimeSignature(TimeSignature {
                    time_signature: "4/4".to_string(),
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::Tempo(Tempo {
                    tempo: 120.0,
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::KeySignature(KeySignature {
                    key_signature: "C Maj".to_string(),
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::Mark(TrackMark {
                    name: Some("Intro".to_string()),
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::Cc(CcEvent {
                    id: Some(7),
                    value: Some(100),
                    ..CcEvent::default()
                }),
                TrackEvent::Pc(PcEvent {
                    pc: Some(1),
                    ..PcEvent::default()
                }),
                TrackEvent::Comment(Comment {
                    text: "setup done".to_string(),
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::Template(TemplateRef {
                    id: 1,
                    tick: Some(0),
                    step: None,
                }),
                TrackEvent::Eot(Eot {
                    tick: Some(1920),
                    step: None,
                }),
            ],
            ..Track::default()
        };

        // Through markup text: the reader's attribute coercion is what turns
        // the three-decimal tempo string back into a number.
        let document = crate::xml::Document {
            declaration: None,
            root: Some(track.encode().expect("encode")),
        };
        let text = crate::xml::serialize(&document, &crate::xml::EncodeOptions::default())
            .expect("serialize");
        let reparsed = crate::xml::parse(&text).expect("parse");
        let decoded = Track::decode(&reparsed.root.expect("root")).expect("decode");
        assert_eq!(decoded, track);
    }

    #[test]
    fn default_data_keeps_mark_and_track_interleaving() {
        let data = DefaultData {
            items: vec![
                DefaultDataItem::Mark(Mark {
                    meas: 1,
                    name: Some("A".to_string()),
                }),
                DefaultDataItem::Track(Track::default()),
                DefaultDataItem::Mark(Mark {
                    meas: 9,
                    name: None,
                }),
            ],
        };
        let el = data.encode().expect("encode");
        assert_eq!(DefaultData::decode(&el).expect("decode"), data);
    }
}
