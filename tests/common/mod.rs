#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Assembles container bytes for test fixtures.
pub struct ContainerBuilder {
    tag: [u8; 4],
    version: u32,
    sections: Vec<(u32, Vec<u8>)>,
}

impl ContainerBuilder {
    pub fn new(tag: &[u8; 4], version: u32) -> Self {
        Self {
            tag: *tag,
            version,
            sections: Vec::new(),
        }
    }

    pub fn section(mut self, section_type: u32, payload: &[u8]) -> Self {
        self.sections.push((section_type, payload.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&(self.sections.len() as u32).to_le_bytes());
        for (section_type, payload) in &self.sections {
            out.extend_from_slice(&section_type.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }

    pub fn write_temp(&self) -> NamedTempFile {
        write_temp_bytes(&self.build())
    }
}

pub fn write_temp_bytes(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
