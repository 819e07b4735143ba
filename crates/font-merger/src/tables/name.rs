//! name table adapter

use log::warn;
use read_fonts::{
    FontRef, TableProvider,
    tables::name::{Encoding, MacRomanMapping, Name as ReadName},
};
use write_fonts::tables::name::{Name, NameRecord};

use crate::{Result, tables::NamingTable};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Record {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    value: String,
}

/// Decoded name records, in table order
#[derive(Clone, Debug)]
pub struct NameTable {
    records: Vec<Record>,
    modified: bool,
}

impl NameTable {
    /// `None` when the font has no readable `name` table.
    pub fn new(font: &FontRef) -> Option<Self> {
        let name = font.name().ok()?;
        Some(Self { records: decode(&name), modified: false })
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn build(&self) -> Name {
        let records = self
            .records
            .iter()
            .filter(|r| {
                let ok = can_encode(r.platform_id, r.encoding_id, &r.value);
                if !ok {
                    warn!(
                        "Name record {} ({}, {}) cannot be re-encoded; dropping it",
                        r.name_id, r.platform_id, r.encoding_id
                    );
                }
                ok
            })
            .map(|r| {
                NameRecord::new(
                    r.platform_id,
                    r.encoding_id,
                    r.language_id,
                    read_fonts::types::NameId::new(r.name_id),
                    r.value.clone().into(),
                )
            })
            .collect();
        Name::new(records)
    }
}

impl NamingTable for NameTable {
    fn get(&self, name_id: u16) -> Option<String> {
        self.records.iter().find(|r| r.name_id == name_id).map(|r| r.value.clone())
    }

    /// Records whose encoding cannot represent `value` (Mac Roman for
    /// non-Latin text) are removed rather than left stale.
    fn set(&mut self, name_id: u16, value: &str) -> usize {
        let before = self.records.len();
        let mut count = 0;
        self.records.retain_mut(|record| {
            if record.name_id != name_id {
                return true;
            }
            if !can_encode(record.platform_id, record.encoding_id, value) {
                warn!(
                    "Name {name_id} value {value:?} cannot be encoded for platform ({}, {}); \
                     dropping that record",
                    record.platform_id, record.encoding_id
                );
                return false;
            }
            record.value = value.to_string();
            count += 1;
            true
        });
        if count > 0 || self.records.len() != before {
            self.modified = true;
        }
        count
    }
}

fn can_encode(platform_id: u16, encoding_id: u16, value: &str) -> bool {
    match Encoding::new(platform_id, encoding_id) {
        Encoding::Utf16Be => true,
        Encoding::MacRoman => value.chars().all(|c| MacRomanMapping.encode(c).is_some()),
        Encoding::Unknown => false,
    }
}

fn decode(name: &ReadName) -> Vec<Record> {
    name.name_record()
        .iter()
        .filter_map(|record| {
            let name_id = record.name_id().to_u16();
            let value = match record.string(name.string_data()) {
                Ok(s) => s.chars().collect::<String>(),
                Err(e) => {
                    warn!("Name record {name_id} could not be decoded ({e}); dropping it");
                    return None;
                }
            };
            Some(Record {
                platform_id: record.platform_id(),
                encoding_id: record.encoding_id(),
                language_id: record.language_id(),
                name_id,
                value,
            })
        })
        .collect()
}

/// Read one name record from font bytes, preferring Windows English.
pub fn read_name(font: &FontRef, name_id: u16) -> Result<Option<String>> {
    let name = font.name()?;
    let records = decode(&name);
    let preferred = records
        .iter()
        .find(|r| r.name_id == name_id && r.platform_id == 3 && r.language_id == 0x409)
        .or_else(|| records.iter().find(|r| r.name_id == name_id));
    Ok(preferred.map(|r| r.value.clone()))
}
