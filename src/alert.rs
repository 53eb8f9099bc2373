//! Service alerts: `Alert`, its enums, and the translated-text types.

use serde::Serialize;

use crate::codec;
use crate::descriptor::EntitySelector;
use crate::error::DecodeErrorKind;
use crate::message::{Message, ProtoEnum, join_path};
use crate::unknown::UnknownFieldSet;
use crate::wire::{Reader, WireType};

/// A POSIX-seconds interval; either bound may be open.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: Option<u64>,
    pub end: Option<u64>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl TimeRange {
    /// Whether `at` falls inside the range, treating absent bounds as open.
    pub fn contains(&self, at: u64) -> bool {
        self.start.is_none_or(|start| start <= at) && self.end.is_none_or(|end| at < end)
    }
}

impl Message for TimeRange {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::Varint) => self.start = Some(reader.read_varint()?),
            (2, WireType::Varint) => self.end = Some(reader.read_varint()?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(start) = self.start {
            codec::put_uint64(buf, 1, start);
        }
        if let Some(end) = self.end {
            codec::put_uint64(buf, 2, end);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.start.map_or(0, |v| codec::uint64_len(1, v))
            + self.end.map_or(0, |v| codec::uint64_len(2, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.start, &other.start);
        codec::merge_optional(&mut self.end, &other.end);
        self.unknown_fields.merge(&other.unknown_fields);
    }
}

/// One localization of a translated string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// UTF-8 text. Required.
    pub text: Option<String>,
    /// BCP-47 language code; at most one translation per string may leave
    /// it unset.
    pub language: Option<String>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Translation {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl Message for Translation {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => self.text = Some(codec::read_string(reader)?),
            (2, WireType::LengthDelimited) => self.language = Some(codec::read_string(reader)?),
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        if let Some(text) = &self.text {
            codec::put_string(buf, 1, text);
        }
        if let Some(language) = &self.language {
            codec::put_string(buf, 2, language);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.text.as_deref().map_or(0, |v| codec::string_len(1, v))
            + self.language.as_deref().map_or(0, |v| codec::string_len(2, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        codec::merge_optional(&mut self.text, &other.text);
        codec::merge_optional(&mut self.language, &other.language);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        if self.text.is_none() {
            missing.push(join_path(prefix, "text"));
        }
    }
}

/// A message in one or more languages; at least one translation by
/// convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedString {
    pub translation: Vec<Translation>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl TranslatedString {
    /// Convenience constructor for a single-language string.
    pub fn from_text(text: impl Into<String>) -> Self {
        TranslatedString {
            translation: vec![Translation {
                text: Some(text.into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }
}

impl Message for TranslatedString {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => codec::push_message(&mut self.translation, reader)?,
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        for translation in &self.translation {
            codec::put_message(buf, 1, translation);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.translation
            .iter()
            .map(|m| codec::message_len(1, m))
            .sum::<usize>()
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        self.translation.extend(other.translation.iter().cloned());
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        for (index, translation) in self.translation.iter().enumerate() {
            let path = format!("{}[{index}]", join_path(prefix, "translation"));
            translation.missing_required(&path, missing);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Cause {
    #[default]
    UnknownCause = 1,
    OtherCause = 2,
    TechnicalProblem = 3,
    Strike = 4,
    Demonstration = 5,
    Accident = 6,
    Holiday = 7,
    Weather = 8,
    Maintenance = 9,
    Construction = 10,
    PoliceActivity = 11,
    MedicalEmergency = 12,
}

impl ProtoEnum for Cause {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Cause::UnknownCause),
            2 => Some(Cause::OtherCause),
            3 => Some(Cause::TechnicalProblem),
            4 => Some(Cause::Strike),
            5 => Some(Cause::Demonstration),
            6 => Some(Cause::Accident),
            7 => Some(Cause::Holiday),
            8 => Some(Cause::Weather),
            9 => Some(Cause::Maintenance),
            10 => Some(Cause::Construction),
            11 => Some(Cause::PoliceActivity),
            12 => Some(Cause::MedicalEmergency),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum Effect {
    NoService = 1,
    ReducedService = 2,
    SignificantDelays = 3,
    Detour = 4,
    AdditionalService = 5,
    ModifiedService = 6,
    OtherEffect = 7,
    #[default]
    UnknownEffect = 8,
    StopMoved = 9,
    NoEffect = 10,
    AccessibilityIssue = 11,
}

impl ProtoEnum for Effect {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Effect::NoService),
            2 => Some(Effect::ReducedService),
            3 => Some(Effect::SignificantDelays),
            4 => Some(Effect::Detour),
            5 => Some(Effect::AdditionalService),
            6 => Some(Effect::ModifiedService),
            7 => Some(Effect::OtherEffect),
            8 => Some(Effect::UnknownEffect),
            9 => Some(Effect::StopMoved),
            10 => Some(Effect::NoEffect),
            11 => Some(Effect::AccessibilityIssue),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum SeverityLevel {
    #[default]
    UnknownSeverity = 1,
    Info = 2,
    Warning = 3,
    Severe = 4,
}

impl ProtoEnum for SeverityLevel {
    fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(SeverityLevel::UnknownSeverity),
            2 => Some(SeverityLevel::Info),
            3 => Some(SeverityLevel::Warning),
            4 => Some(SeverityLevel::Severe),
            _ => None,
        }
    }

    fn as_i32(self) -> i32 {
        self as i32
    }
}

/// A service disruption notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// When the alert should be shown; always shown when empty.
    pub active_period: Vec<TimeRange>,
    pub informed_entity: Vec<EntitySelector>,
    pub cause: Option<Cause>,
    pub effect: Option<Effect>,
    pub url: Option<TranslatedString>,
    pub header_text: Option<TranslatedString>,
    pub description_text: Option<TranslatedString>,
    pub tts_header_text: Option<TranslatedString>,
    pub tts_description_text: Option<TranslatedString>,
    pub severity_level: Option<SeverityLevel>,
    #[serde(skip)]
    pub unknown_fields: UnknownFieldSet,
}

impl Alert {
    /// The set cause, or `UNKNOWN_CAUSE` when absent.
    pub fn cause(&self) -> Cause {
        self.cause.unwrap_or_default()
    }

    /// The set effect, or `UNKNOWN_EFFECT` when absent.
    pub fn effect(&self) -> Effect {
        self.effect.unwrap_or_default()
    }

    pub fn severity_level(&self) -> SeverityLevel {
        self.severity_level.unwrap_or_default()
    }
}

impl Message for Alert {
    fn merge_field(
        &mut self,
        field: u32,
        wire: WireType,
        reader: &mut Reader<'_>,
    ) -> Result<(), DecodeErrorKind> {
        match (field, wire) {
            (1, WireType::LengthDelimited) => codec::push_message(&mut self.active_period, reader)?,
            (5, WireType::LengthDelimited) => {
                codec::push_message(&mut self.informed_entity, reader)?;
            }
            (6, WireType::Varint) => {
                codec::read_enum(&mut self.cause, 6, reader, &mut self.unknown_fields)?;
            }
            (7, WireType::Varint) => {
                codec::read_enum(&mut self.effect, 7, reader, &mut self.unknown_fields)?;
            }
            (8, WireType::LengthDelimited) => codec::merge_message(&mut self.url, reader)?,
            (10, WireType::LengthDelimited) => codec::merge_message(&mut self.header_text, reader)?,
            (11, WireType::LengthDelimited) => {
                codec::merge_message(&mut self.description_text, reader)?;
            }
            (12, WireType::LengthDelimited) => {
                codec::merge_message(&mut self.tts_header_text, reader)?;
            }
            (13, WireType::LengthDelimited) => {
                codec::merge_message(&mut self.tts_description_text, reader)?;
            }
            (14, WireType::Varint) => {
                codec::read_enum(&mut self.severity_level, 14, reader, &mut self.unknown_fields)?;
            }
            _ => self.unknown_fields.read_value(field, wire, reader)?,
        }
        Ok(())
    }

    fn encode_raw(&self, buf: &mut Vec<u8>) {
        for period in &self.active_period {
            codec::put_message(buf, 1, period);
        }
        for selector in &self.informed_entity {
            codec::put_message(buf, 5, selector);
        }
        if let Some(cause) = self.cause {
            codec::put_enum(buf, 6, cause);
        }
        if let Some(effect) = self.effect {
            codec::put_enum(buf, 7, effect);
        }
        if let Some(url) = &self.url {
            codec::put_message(buf, 8, url);
        }
        if let Some(header_text) = &self.header_text {
            codec::put_message(buf, 10, header_text);
        }
        if let Some(description_text) = &self.description_text {
            codec::put_message(buf, 11, description_text);
        }
        if let Some(tts_header_text) = &self.tts_header_text {
            codec::put_message(buf, 12, tts_header_text);
        }
        if let Some(tts_description_text) = &self.tts_description_text {
            codec::put_message(buf, 13, tts_description_text);
        }
        if let Some(severity) = self.severity_level {
            codec::put_enum(buf, 14, severity);
        }
        self.unknown_fields.encode(buf);
    }

    fn encoded_len(&self) -> usize {
        self.active_period
            .iter()
            .map(|m| codec::message_len(1, m))
            .sum::<usize>()
            + self
                .informed_entity
                .iter()
                .map(|m| codec::message_len(5, m))
                .sum::<usize>()
            + self.cause.map_or(0, |v| codec::enum_len(6, v))
            + self.effect.map_or(0, |v| codec::enum_len(7, v))
            + self.url.as_ref().map_or(0, |m| codec::message_len(8, m))
            + self
                .header_text
                .as_ref()
                .map_or(0, |m| codec::message_len(10, m))
            + self
                .description_text
                .as_ref()
                .map_or(0, |m| codec::message_len(11, m))
            + self
                .tts_header_text
                .as_ref()
                .map_or(0, |m| codec::message_len(12, m))
            + self
                .tts_description_text
                .as_ref()
                .map_or(0, |m| codec::message_len(13, m))
            + self.severity_level.map_or(0, |v| codec::enum_len(14, v))
            + self.unknown_fields.encoded_len()
    }

    fn merge(&mut self, other: &Self) {
        self.active_period.extend(other.active_period.iter().cloned());
        self.informed_entity
            .extend(other.informed_entity.iter().cloned());
        codec::merge_optional(&mut self.cause, &other.cause);
        codec::merge_optional(&mut self.effect, &other.effect);
        codec::merge_optional_message(&mut self.url, &other.url);
        codec::merge_optional_message(&mut self.header_text, &other.header_text);
        codec::merge_optional_message(&mut self.description_text, &other.description_text);
        codec::merge_optional_message(&mut self.tts_header_text, &other.tts_header_text);
        codec::merge_optional_message(&mut self.tts_description_text, &other.tts_description_text);
        codec::merge_optional(&mut self.severity_level, &other.severity_level);
        self.unknown_fields.merge(&other.unknown_fields);
    }

    fn missing_required(&self, prefix: &str, missing: &mut Vec<String>) {
        let texts = [
            ("url", &self.url),
            ("header_text", &self.header_text),
            ("description_text", &self.description_text),
            ("tts_header_text", &self.tts_header_text),
            ("tts_description_text", &self.tts_description_text),
        ];
        for (name, text) in texts {
            if let Some(text) = text {
                text.missing_required(&join_path(prefix, name), missing);
            }
        }
    }
}
