mod common;

use common::{write_temp_bytes, ContainerBuilder};
use zkbin::{
    BinFile, BinFileError, FileSystemError, FormatError, LoadStrategy, OpenOptions, SectionError,
};

const SECTION_A: u32 = 1;
const SECTION_B: u32 = 2;

fn two_b_sections() -> ContainerBuilder {
    ContainerBuilder::new(b"zkey", 1)
        .section(SECTION_A, &[0xA0; 10])
        .section(SECTION_B, &[0xB0; 20])
        .section(SECTION_B, &[0xB1; 5])
}

#[test]
fn round_trip_through_file_with_each_strategy() {
    let file = two_b_sections().write_temp();

    for strategy in [LoadStrategy::Mmap, LoadStrategy::Read, LoadStrategy::MmapOrRead] {
        let bin = OpenOptions::new("zkey", 1)
            .strategy(strategy)
            .open(file.path())
            .unwrap();

        assert_eq!(bin.section_count(SECTION_A), 1);
        assert_eq!(bin.section_count(SECTION_B), 2);
        assert_eq!(bin.section_payload_size(SECTION_B, 0).unwrap(), 20);
        assert_eq!(bin.section_payload_size(SECTION_B, 1).unwrap(), 5);
        assert_eq!(bin.section_payload(SECTION_A, 0).unwrap(), &[0xA0; 10]);
        assert_eq!(bin.section_payload(SECTION_B, 1).unwrap(), &[0xB1; 5]);
        assert_eq!(bin.total_sections(), 3);
        assert_eq!(bin.source().is_mapped(), strategy != LoadStrategy::Read);
    }
}

#[test]
fn version_gate() {
    let file = ContainerBuilder::new(b"zkey", 1).write_temp();

    let bin = BinFile::open(file.path(), "zkey", 1).unwrap();
    assert_eq!(bin.version(), 1);
    assert_eq!(&bin.file_type(), b"zkey");

    match BinFile::open(file.path(), "zkey", 0) {
        Err(BinFileError::Format(FormatError::UnsupportedVersion {
            version: 1,
            max_version: 0,
        })) => {}
        other => panic!("expected UnsupportedVersion, got {:?}", other),
    }
}

#[test]
fn unknown_section_type_counts_zero_but_payload_lookup_fails() {
    let bin = BinFile::from_bytes(two_b_sections().build(), "zkey", 1).unwrap();

    assert_eq!(bin.section_count(99), 0);
    assert!(bin.descriptors(99).is_empty());
    assert!(matches!(
        bin.section_payload(99, 0),
        Err(SectionError::UnknownSectionType(99))
    ));
    assert!(matches!(
        bin.section_payload_size(SECTION_B, 2),
        Err(SectionError::SectionIndexOutOfRange { count: 2, .. })
    ));
    assert_eq!(bin.section_types().collect::<Vec<_>>(), vec![SECTION_A, SECTION_B]);
}

#[test]
fn descriptors_locate_payloads_in_the_buffer() {
    let bin = BinFile::from_bytes(two_b_sections().build(), "zkey", 1).unwrap();

    let descriptors = bin.descriptors(SECTION_B);
    assert_eq!(descriptors.len(), 2);
    for (ordinal, descriptor) in descriptors.iter().enumerate() {
        assert_eq!(descriptor.section_type, SECTION_B);
        assert_eq!(descriptor.index, ordinal);
        assert_eq!(descriptor.range().len(), descriptor.size());
        assert_eq!(descriptor.end(), descriptor.offset() + descriptor.size());
        assert_eq!(
            &bin.data()[descriptor.range()],
            bin.section_payload(SECTION_B, ordinal).unwrap()
        );
    }
    assert_eq!(bin.descriptor(SECTION_B, 1).unwrap(), descriptors[1]);
    assert!(descriptors[1].end() <= bin.data().len());
}

#[test]
fn bad_magic_regardless_of_version_or_table() {
    let fixtures = [
        ContainerBuilder::new(b"wtns", 1).build(),
        ContainerBuilder::new(b"wtns", 99).section(1, b"abc").build(),
        // Section table claims more than is present.
        {
            let mut bytes = ContainerBuilder::new(b"r1cs", 0).build();
            bytes[8] = 5;
            bytes
        },
    ];

    for bytes in fixtures {
        assert!(matches!(
            BinFile::from_bytes(bytes, "zkey", 1),
            Err(FormatError::BadMagic { .. })
        ));
    }
}

#[test]
fn every_truncation_is_reported_as_truncated_file() {
    let full = two_b_sections().build();
    assert!(BinFile::from_bytes(full.as_slice(), "zkey", 1).is_ok());

    for len in 0..full.len() {
        match BinFile::from_bytes(&full[..len], "zkey", 1) {
            Err(FormatError::TruncatedFile { len: reported, .. }) => assert_eq!(reported, len),
            other => panic!("prefix of {} bytes: expected TruncatedFile, got {:?}", len, other),
        }
    }
}

#[test]
fn header_with_partial_descriptor_is_truncated() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"zkey");
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 8]);

    assert!(matches!(
        BinFile::from_bytes(bytes, "zkey", 1),
        Err(FormatError::TruncatedFile { .. })
    ));
}

#[test]
fn trailing_bytes_after_last_section_are_ignored() {
    let mut bytes = two_b_sections().build();
    bytes.extend_from_slice(&[0xFF; 3]);

    let bin = BinFile::from_bytes(bytes, "zkey", 1).unwrap();
    assert_eq!(bin.total_sections(), 3);
}

#[test]
fn missing_file_is_a_file_system_error() {
    let dir = tempfile::tempdir().unwrap();
    match BinFile::open(dir.path().join("absent.zkey"), "zkey", 1) {
        Err(BinFileError::FileSystem(FileSystemError::NotFound { .. })) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn typed_view_requires_size_and_alignment() {
    // Mapped files are page aligned, so payload alignment follows file offsets:
    // section 1 payload at 24, section 2 at 44, section 3 at 59.
    let mut words = Vec::new();
    words.extend_from_slice(&7u32.to_le_bytes());
    words.extend_from_slice(&9u32.to_le_bytes());
    let file = ContainerBuilder::new(b"zkey", 1)
        .section(1, &words)
        .section(2, &[1, 2, 3])
        .section(3, &[0; 4])
        .write_temp();

    let bin = OpenOptions::new("zkey", 1)
        .strategy(LoadStrategy::Mmap)
        .open(file.path())
        .unwrap();
    assert!(bin.source().is_mapped());

    if cfg!(target_endian = "little") {
        assert_eq!(bin.section_payload_as::<u32>(1, 0).unwrap(), &[7, 9]);
    }
    assert!(matches!(
        bin.section_payload_as::<u32>(2, 0),
        Err(SectionError::Cast { section_type: 2, .. })
    ));
    assert!(matches!(
        bin.section_payload_as::<u32>(3, 0),
        Err(SectionError::Cast { section_type: 3, .. })
    ));
    assert_eq!(bin.section_payload_as::<u8>(2, 0).unwrap(), &[1, 2, 3]);
}

#[test]
fn parses_borrowed_and_owned_buffers_alike() {
    let bytes = two_b_sections().build();
    let options = OpenOptions::new("zkey", 1);

    let borrowed = options.parse(bytes.as_slice()).unwrap();
    let owned = options.parse(bytes.clone()).unwrap();

    assert_eq!(
        borrowed.section_payload(SECTION_B, 0).unwrap(),
        owned.section_payload(SECTION_B, 0).unwrap()
    );
    assert_eq!(owned.into_inner(), bytes);
}

#[test]
fn empty_file_is_truncated_not_a_crash() {
    let file = write_temp_bytes(&[]);
    match BinFile::open(file.path(), "zkey", 1) {
        Err(BinFileError::Format(FormatError::TruncatedFile { offset: 0, len: 0, .. })) => {}
        other => panic!("expected TruncatedFile, got {:?}", other),
    }
}
